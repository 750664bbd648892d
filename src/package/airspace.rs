use crate::{
    error::{CifpResult, Error},
    geo::{Altitude, Coordinate, Course},
    loaders::cifp::airspace::{AirspaceKind, AirspaceSegment, BoundaryPath, BoundaryVia},
};

use super::procedure::AltitudeRestriction;

const ARC_ENDPOINT_TOLERANCE: f64 = 0.25;
const OUTSIDE_MARGIN: f64 = 0.1;
const DENSIFY_STEP: f64 = 5.0;

/// A controlled or restrictive airspace made of one or more closed loops.
#[derive(Debug, Clone)]
pub struct Airspace {
    pub designator: String,
    pub kind: AirspaceKind,
    pub name: Option<String>,
    pub loops: Vec<BoundaryLoop>,
    pub cycle: u16,
}

impl Airspace {
    /// Splits the segments of one airspace into loops at each return to
    /// origin.
    pub fn try_assemble(segments: Vec<AirspaceSegment>) -> CifpResult<Self> {
        let first = segments.first().ok_or(Error::OpenBoundary)?;
        let designator = first.designator.clone();
        let kind = first.kind;
        let name = segments.iter().find_map(|segment| segment.name.clone());
        let cycle = segments.iter().map(|segment| segment.cycle).max().unwrap_or_default();

        let mut loops = Vec::new();
        let mut current = Vec::new();
        for segment in segments {
            let closes = segment.returns_to_origin;
            current.push(segment);
            if closes {
                loops.push(BoundaryLoop::try_from_segments(std::mem::take(&mut current))?);
            }
        }
        if !current.is_empty() {
            return Err(Error::OpenBoundary);
        }

        Ok(Self { designator, kind, name, loops, cycle })
    }

    pub fn contains(&self, point: Coordinate, altitude: Altitude) -> bool {
        self.loops.iter().any(|boundary| boundary.contains(point, altitude))
    }
}

#[derive(Debug, Clone)]
enum Region {
    Circle { center: Coordinate, radius: f64 },
    Lines { vertices: Vec<Coordinate> },
    Arcs { lines: Vec<(Coordinate, Coordinate)>, arcs: Vec<ArcEdge>, outside: Coordinate },
}

/// An arc edge, in true degrees clockwise from north about `origin`.
#[derive(Debug, Clone, Copy)]
struct ArcEdge {
    origin: Coordinate,
    radius: f64,
    start: f64,
    end: f64,
    clockwise: bool,
}

impl ArcEdge {
    fn spans(&self, theta: f64) -> bool {
        let (start, end) = (self.start, self.end);
        match (self.clockwise, start < end) {
            (true, true) => theta > start && theta < end,
            (true, false) => theta > start || theta < end,
            (false, false) => theta < start && theta > end,
            (false, true) => theta < start || theta > end,
        }
    }

    /// Whether the segment from `point` to `target` crosses this arc an odd
    /// number of times.
    ///
    /// Works in a plane local to the arc origin with longitudes scaled by the
    /// cosine of its latitude, so the arc is a circle of `radius / 60` degrees.
    fn crossed_by(&self, point: Coordinate, target: Coordinate) -> bool {
        let scale = self.origin.lat.to_radians().cos();
        let (px, py) = ((point.lon - self.origin.lon) * scale, point.lat - self.origin.lat);
        let (dx, dy) = ((target.lon - point.lon) * scale, target.lat - point.lat);
        let r = self.radius / 60.0;

        let a = dx * dx + dy * dy;
        let b = 2.0 * (px * dx + py * dy);
        let c = px * px + py * py - r * r;
        let discriminant = b * b - 4.0 * a * c;
        if a == 0.0 || discriminant < 0.0 {
            return false;
        }

        let root = discriminant.sqrt();
        [(-b - root) / (2.0 * a), (-b + root) / (2.0 * a)]
            .into_iter()
            .filter(|t| (0.0..=1.0).contains(t))
            .map(|t| Course::true_course(90.0 - (py + t * dy).atan2(px + t * dx).to_degrees()).degrees())
            .filter(|theta| self.spans(*theta))
            .count()
            % 2
            == 1
    }
}

/// One closed ring of an airspace with the vertical band of its first
/// segment.
#[derive(Debug, Clone)]
pub struct BoundaryLoop {
    pub segments: Vec<AirspaceSegment>,
    pub vertical: AltitudeRestriction,
    region: Region,
}

impl BoundaryLoop {
    pub fn try_from_segments(segments: Vec<AirspaceSegment>) -> CifpResult<Self> {
        let first = segments.first().ok_or(Error::OpenBoundary)?;
        if first.lower.is_none() && first.upper.is_none() {
            return Err(Error::MissingVerticalBounds);
        }
        let vertical = AltitudeRestriction::new(first.lower, first.upper);

        let region = match segments.as_slice() {
            [only] if only.via == BoundaryVia::Circle => match only.path {
                BoundaryPath::Circle { center, radius } => Region::Circle { center, radius },
                _ => return Err(Error::UnsupportedBoundary("circle without a radius")),
            },
            _ if segments.iter().any(|segment| matches!(segment.path, BoundaryPath::Circle { .. })) => {
                return Err(Error::UnsupportedBoundary("circle within a multi-segment loop"))
            }
            _ if segments.iter().any(|segment| matches!(segment.path, BoundaryPath::Arc { .. })) => {
                arc_region(&segments)?
            }
            _ => Region::Lines {
                vertices: segments.iter().map(|segment| segment.path.vertex()).collect(),
            },
        };

        Ok(Self { segments, vertical, region })
    }

    /// Bounds that cannot be compared (AGL over unknown ground) do not
    /// exclude.
    pub fn contains(&self, point: Coordinate, altitude: Altitude) -> bool {
        if !self.vertical.contains(&altitude) {
            return false;
        }

        match &self.region {
            Region::Circle { center, radius } => center.distance_to(&point) <= *radius,
            Region::Lines { vertices } => polygon_contains(vertices, point),
            Region::Arcs { lines, arcs, outside } => {
                let lines_crossed = lines
                    .iter()
                    .filter(|(from, to)| segments_cross(*from, *to, point, *outside))
                    .count();
                let arcs_crossed = arcs.iter().filter(|arc| arc.crossed_by(point, *outside)).count();
                (lines_crossed + arcs_crossed) % 2 == 1
            }
        }
    }

    /// The ring as a closed list of points, arcs and circles densified every
    /// few degrees.
    pub fn outline(&self) -> CifpResult<Vec<Coordinate>> {
        let mut points = Vec::new();
        for (index, segment) in self.segments.iter().enumerate() {
            let next = self.segments[(index + 1) % self.segments.len()].path.vertex();
            match segment.path {
                BoundaryPath::Line { vertex } => points.push(vertex),
                BoundaryPath::Arc { from, origin, distance, bearing } => {
                    let clockwise = segment.via == BoundaryVia::ClockwiseArc;
                    let end = origin.initial_bearing_to(&next);
                    let start = bearing.true_degrees()?;
                    let end = end.map_or(Ok(360.0), |end| end.true_degrees())?;
                    let sweep = match clockwise {
                        true => (end - start).rem_euclid(360.0),
                        false => (start - end).rem_euclid(360.0),
                    };

                    points.push(from);
                    let mut swept = DENSIFY_STEP;
                    while swept < sweep {
                        let heading = if clockwise { start + swept } else { start - swept };
                        points.push(origin.fix_radial_distance(&Course::true_course(heading), distance)?);
                        swept += DENSIFY_STEP;
                    }
                }
                BoundaryPath::Circle { center, radius } => {
                    let mut heading = 0.0;
                    while heading < 360.0 {
                        points.push(center.fix_radial_distance(&Course::true_course(heading), radius)?);
                        heading += DENSIFY_STEP;
                    }
                }
            }
        }

        if let Some(first) = points.first().copied() {
            points.push(first);
        }
        Ok(points)
    }
}

fn arc_region(segments: &[AirspaceSegment]) -> CifpResult<Region> {
    let mut lines = Vec::new();
    let mut arcs = Vec::new();
    let mut min_lat = f64::INFINITY;
    let mut min_lon = f64::INFINITY;

    for (index, segment) in segments.iter().enumerate() {
        let next = segments[(index + 1) % segments.len()].path.vertex();
        let vertex = segment.path.vertex();
        min_lat = min_lat.min(vertex.lat);
        min_lon = min_lon.min(vertex.lon);

        match segment.path {
            BoundaryPath::Line { vertex } => lines.push((vertex, next)),
            BoundaryPath::Arc { origin, distance, bearing, .. } => {
                let (_, to_next) = origin.bearing_distance_to(&next);
                if (to_next - distance).abs() > ARC_ENDPOINT_TOLERANCE {
                    return Err(Error::ArcMisaligned { from: next, origin, distance });
                }

                let extent = distance / 60.0;
                min_lat = min_lat.min(origin.lat - extent);
                min_lon = min_lon.min(origin.lon - extent / origin.lat.to_radians().cos());

                arcs.push(ArcEdge {
                    origin,
                    radius: distance,
                    start: bearing.true_degrees()?,
                    end: origin.initial_bearing_to(&next).map_or(Ok(360.0), |end| end.true_degrees())?,
                    clockwise: segment.via == BoundaryVia::ClockwiseArc,
                });
            }
            BoundaryPath::Circle { .. } => return Err(Error::UnsupportedBoundary("circle within a multi-segment loop")),
        }
    }

    let margin = OUTSIDE_MARGIN / 60.0;
    Ok(Region::Arcs {
        lines,
        arcs,
        outside: Coordinate::new(min_lat - margin, min_lon - margin),
    })
}

fn orientation(p: Coordinate, q: Coordinate, r: Coordinate) -> bool {
    (q.lat - p.lat) * (r.lon - q.lon) - (q.lon - p.lon) * (r.lat - q.lat) > 0.0
}

fn segments_cross(from: Coordinate, to: Coordinate, point: Coordinate, target: Coordinate) -> bool {
    orientation(from, to, point) != orientation(from, to, target)
        && orientation(point, target, from) != orientation(point, target, to)
}

const EPSILON: f64 = 1.1102230246251565e-16;
const ERRBOUND3: f64 = (3.0 + 16.0 * EPSILON) * EPSILON;

/// Exact product as a value and its rounding error.
fn two_product(a: f64, b: f64) -> [f64; 2] {
    let product = a * b;
    [product, a.mul_add(b, -product)]
}

/// Compensated sum of every term.
fn accurate_sum(terms: impl IntoIterator<Item = f64>) -> f64 {
    let mut sum = 0.0_f64;
    let mut compensation = 0.0_f64;
    for term in terms {
        let next = sum + term;
        compensation += if sum.abs() >= term.abs() {
            (sum - next) + term
        } else {
            (term - next) + sum
        };
        sum = next;
    }
    sum + compensation
}

/// Signed area of the triangle `abc` with latitude as the first axis. Zero
/// means collinear.
fn orient3(a: Coordinate, b: Coordinate, c: Coordinate) -> f64 {
    let l = (a.lon - c.lon) * (b.lat - c.lat);
    let r = (a.lat - c.lat) * (b.lon - c.lon);
    let det = l - r;

    let sum = if l > 0.0 {
        if r <= 0.0 {
            return det;
        }
        l + r
    } else if l < 0.0 {
        if r >= 0.0 {
            return det;
        }
        -(l + r)
    } else {
        return det;
    };

    let tolerance = ERRBOUND3 * sum;
    if det >= tolerance || det <= -tolerance {
        return det;
    }

    let terms = [
        two_product(b.lon, c.lat),
        two_product(-c.lon, b.lat),
        two_product(a.lon, b.lat),
        two_product(-b.lon, a.lat),
        two_product(-a.lon, c.lat),
        two_product(c.lon, a.lat),
    ];
    accurate_sum(terms.into_iter().flatten())
}

/// Scan-line point in polygon over latitude (`x`) and longitude (`y`).
/// Points on an edge are inside.
fn polygon_contains(vertices: &[Coordinate], point: Coordinate) -> bool {
    let (x, y) = (point.lat, point.lon);
    let n = vertices.len();
    if n == 0 {
        return false;
    }

    let mut inside = true;
    let mut limit = n;
    let mut i = 0;
    let mut j = n - 1;
    while i < limit {
        let (a, b) = (vertices[i], vertices[j]);
        let (xi, yi) = (a.lat, a.lon);
        let (xj, yj) = (b.lat, b.lon);

        if yj < yi {
            let crossing = (yj < y && y < yi) || (y == yi && yi < vertices[(i + 1) % n].lon);
            if crossing {
                let s = orient3(a, b, point);
                if s == 0.0 {
                    return true;
                }
                inside ^= 0.0 < s;
            }
        } else if yi < yj {
            let crossing = (yi < y && y < yj) || (y == yi && vertices[(i + 1) % n].lon < yi);
            if crossing {
                let s = orient3(a, b, point);
                if s == 0.0 {
                    return true;
                }
                inside ^= s < 0.0;
            }
        } else if y == yi {
            let (mut x0, mut x1) = (xi.min(xj), xi.max(xj));

            if i == 0 {
                while j > 0 {
                    let k = (j + n - 1) % n;
                    let previous = vertices[k];
                    if previous.lon != y {
                        break;
                    }
                    x0 = x0.min(previous.lat);
                    x1 = x1.max(previous.lat);
                    j = k;
                }

                if j == 0 {
                    return x0 <= x && x <= x1;
                }
                limit = j + 1;
            }

            let y0 = vertices[(j + n - 1) % n].lon;
            while i + 1 < limit {
                let following = vertices[i + 1];
                if following.lon != y {
                    break;
                }
                x0 = x0.min(following.lat);
                x1 = x1.max(following.lat);
                i += 1;
            }

            if x0 <= x && x <= x1 {
                return true;
            }

            let y1 = vertices[(i + 1) % n].lon;
            if x < x0 && ((y0 < y) != (y1 < y)) {
                inside = !inside;
            }
        }

        j = i;
        i += 1;
    }

    !inside
}
