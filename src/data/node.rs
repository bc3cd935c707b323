/// One node location as read off a page, before any id resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNodeObservation {
    pub map_name: String,
    pub node_name: String,
    pub x: f64,
    pub y: f64,
}

impl RawNodeObservation {
    pub fn new(map_name: impl Into<String>, node_name: impl Into<String>, x: f64, y: f64) -> Self {
        RawNodeObservation {
            map_name: map_name.into(),
            node_name: node_name.into(),
            x,
            y,
        }
    }
}
