// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time kernel.  This is the hottest loop in the program:
//! it runs once per pixel, has no side effects, and touches no shared
//! state, so workers and threads can call it freely.

use num::Complex;

/// The squared bailout radius.  Comparing `norm_sqr` against this
/// avoids a square root per iteration.
pub const BAILOUT: f64 = 4.0;

/// Iterate `z = z * z + point` from zero and return the number of
/// iterations completed before `|z|` reached 2.  A point that is
/// still bounded after `max_iterations` steps yields
/// `max_iterations` itself, which callers treat exactly like an
/// escape at that count.
pub fn escape_count(point: Complex<f64>, max_iterations: usize) -> usize {
    let mut z = Complex {
        re: 0.0_f64,
        im: 0.0_f64,
    };
    for count in 0..max_iterations {
        z = z * z + point;
        if z.norm_sqr() >= BAILOUT {
            return count;
        }
    }
    max_iterations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn far_points_escape_immediately() {
        assert_eq!(escape_count(Complex::new(5.0, 5.0), 256), 0);
        assert_eq!(escape_count(Complex::new(-2.0, -2.0), 256), 0);
    }

    #[test]
    fn bailout_is_inclusive() {
        // z1 = -2 lands exactly on the radius.
        assert_eq!(escape_count(Complex::new(-2.0, 0.0), 256), 0);
        // z1 = 1, z2 = 2.
        assert_eq!(escape_count(Complex::new(1.0, 0.0), 256), 1);
    }

    #[test]
    fn origin_never_escapes() {
        assert_eq!(escape_count(Complex::new(0.0, 0.0), 256), 256);
        assert_eq!(escape_count(Complex::new(0.0, 0.0), 10), 10);
        assert_eq!(escape_count(Complex::new(-1.0, 0.0), 1000), 1000);
    }

    #[test]
    fn slow_escape_on_the_real_axis() {
        // 0.5, 0.75, 1.0625, 1.6289..., 3.1533...
        assert_eq!(escape_count(Complex::new(0.5, 0.0), 256), 4);
        // A small bound reports the bound.
        assert_eq!(escape_count(Complex::new(0.5, 0.0), 3), 3);
    }

    #[test]
    fn zero_iterations_reports_zero() {
        assert_eq!(escape_count(Complex::new(0.0, 0.0), 0), 0);
    }

    #[test]
    fn repeated_calls_agree() {
        let c = Complex::new(-0.743_643_887, 0.131_825_904);
        let first = escape_count(c, 500);
        for _ in 0..10 {
            assert_eq!(escape_count(c, 500), first);
        }
    }
}
