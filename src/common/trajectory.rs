/// Substituted for an empty trajectory at stop time: a short diagonal stroke on the z = 0 plane.
pub const DEFAULT_COORDINATES: &str =
    "0.0,0.0,0.0;0.25,0.25,0.0;0.5,0.5,0.0;0.75,0.75,0.0;1.0,1.0,0.0";

/// Trims a `x,y,z;x,y,z;...` string, falling back to [`DEFAULT_COORDINATES`] when empty.
pub fn coordinates_or_default(coordinates: &str) -> String {
    let trimmed = coordinates.trim();
    if trimmed.is_empty() {
        DEFAULT_COORDINATES.to_string()
    } else {
        trimmed.to_string()
    }
}
