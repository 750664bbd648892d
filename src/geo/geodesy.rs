//! Vincenty direct and inverse solutions on the WGS-84 ellipsoid, with all
//! lengths in nautical miles. Spherical distance and bearing go through
//! [`aviation_calc_util`] on [`Coordinate`].

use super::Coordinate;

pub const SEMI_MAJOR_AXIS: f64 = 3443.918;
pub const SEMI_MINOR_AXIS: f64 = 3432.3716599595;
pub const FLATTENING: f64 = 1.0 / 298.257223563;

const CONVERGENCE: f64 = 1e-9;
const MAX_ITERATIONS: usize = 100;

fn vincenty_coefficients(cos_sq_alpha: f64) -> (f64, f64) {
    let a2 = SEMI_MAJOR_AXIS * SEMI_MAJOR_AXIS;
    let b2 = SEMI_MINOR_AXIS * SEMI_MINOR_AXIS;
    let u_sq = cos_sq_alpha * (a2 - b2) / b2;
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
    (big_a, big_b)
}

fn delta_sigma(big_b: f64, sin_sigma: f64, cos_sigma: f64, cos_2sm: f64) -> f64 {
    big_b
        * sin_sigma
        * (cos_2sm
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_2sm * cos_2sm)
                    - big_b / 6.0
                        * cos_2sm
                        * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                        * (-3.0 + 4.0 * cos_2sm * cos_2sm)))
}

fn normalize_longitude(lon: f64) -> f64 {
    (lon + 540.0).rem_euclid(360.0) - 180.0
}

/// Solves the direct problem: the point `distance` nmi from `origin` along the
/// true bearing `bearing` (degrees).
pub fn destination(origin: Coordinate, bearing: f64, distance: f64) -> Coordinate {
    let f = FLATTENING;
    let (sin_a1, cos_a1) = bearing.to_radians().sin_cos();

    let tan_u1 = (1.0 - f) * origin.lat.to_radians().tan();
    let cos_u1 = 1.0 / (1.0 + tan_u1 * tan_u1).sqrt();
    let sin_u1 = tan_u1 * cos_u1;

    let sigma1 = tan_u1.atan2(cos_a1);
    let sin_alpha = cos_u1 * sin_a1;
    let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
    let (big_a, big_b) = vincenty_coefficients(cos_sq_alpha);

    let first_guess = distance / (SEMI_MINOR_AXIS * big_a);
    let mut sigma = first_guess;
    for _ in 0..MAX_ITERATIONS {
        let cos_2sm = (2.0 * sigma1 + sigma).cos();
        let (sin_sigma, cos_sigma) = sigma.sin_cos();
        let previous = sigma;
        sigma = first_guess + delta_sigma(big_b, sin_sigma, cos_sigma, cos_2sm);
        if (sigma - previous).abs() <= CONVERGENCE {
            break;
        }
    }

    let cos_2sm = (2.0 * sigma1 + sigma).cos();
    let (sin_sigma, cos_sigma) = sigma.sin_cos();
    let tmp = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_a1;
    let lat2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_a1)
        .atan2((1.0 - f) * (sin_alpha * sin_alpha + tmp * tmp).sqrt());
    let lambda = (sin_sigma * sin_a1).atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_a1);
    let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
    let l = lambda
        - (1.0 - c)
            * f
            * sin_alpha
            * (sigma + c * sin_sigma * (cos_2sm + c * cos_sigma * (-1.0 + 2.0 * cos_2sm * cos_2sm)));

    Coordinate::new(
        lat2.to_degrees(),
        normalize_longitude(origin.lon + l.to_degrees()),
    )
}

/// Solves the inverse problem, returning the initial true bearing from `from`
/// to `to` and the distance between them.
///
/// The bearing is `None` when the points coincide or the solution does not
/// converge to a usable azimuth.
pub fn inverse(from: Coordinate, to: Coordinate) -> (Option<f64>, f64) {
    if from == to {
        return (None, 0.0);
    }

    let f = FLATTENING;
    let l = (to.lon - from.lon).to_radians();
    let u1 = ((1.0 - f) * from.lat.to_radians().tan()).atan();
    let u2 = ((1.0 - f) * to.lat.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    let mut sin_sigma = 0.0;
    let mut cos_sigma = 0.0;
    let mut sigma = 0.0;
    let mut cos_sq_alpha = 0.0;
    let mut cos_2sm = 0.0;

    for _ in 0..MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let cross = cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda;
        sin_sigma = ((cos_u2 * sin_lambda).powi(2) + cross * cross).sqrt();
        if sin_sigma == 0.0 {
            return (None, 0.0);
        }
        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        // Equatorial lines have no meaningful midpoint latitude.
        cos_2sm = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            0.0
        };
        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));

        let previous = lambda;
        lambda = l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma + c * sin_sigma * (cos_2sm + c * cos_sigma * (-1.0 + 2.0 * cos_2sm * cos_2sm)));
        if (lambda - previous).abs() <= CONVERGENCE {
            break;
        }
    }

    let (big_a, big_b) = vincenty_coefficients(cos_sq_alpha);
    let distance = SEMI_MINOR_AXIS * big_a * (sigma - delta_sigma(big_b, sin_sigma, cos_sigma, cos_2sm));
    if distance.is_nan() {
        return (None, 0.0);
    }

    let (sin_lambda, cos_lambda) = lambda.sin_cos();
    let alpha1 = (cos_u2 * sin_lambda).atan2(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda);
    if alpha1.is_nan() {
        return (None, distance);
    }

    (Some(alpha1.to_degrees()), distance)
}
