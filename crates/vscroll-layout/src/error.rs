use indextree::NodeId;

/// Errors raised while editing or laying out a tree.
///
/// These indicate a programming error upstream. Layout passes propagate them
/// unchanged, leaving whatever the caller rendered last in place.
#[derive(Debug, Clone)]
pub enum LayoutError {
    InvalidInterval { start: f32, end: f32 },
    InvalidAspectRatio { index: usize, value: f32 },
    MissingNode { id: NodeId },
    NotAContainer { id: NodeId },
    InvalidEdit(indextree::NodeError),
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutError::InvalidInterval { start, end } => {
                write!(f, "invalid interval [{start}, {end}]")
            }
            LayoutError::InvalidAspectRatio { index, value } => {
                write!(f, "item {index} has invalid aspect ratio {value}")
            }
            LayoutError::MissingNode { id } => write!(f, "node {id:?} missing"),
            LayoutError::NotAContainer { id } => write!(f, "node {id:?} is not a container"),
            LayoutError::InvalidEdit(err) => write!(f, "invalid tree edit: {err}"),
        }
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LayoutError::InvalidEdit(err) => Some(err),
            _ => None,
        }
    }
}

impl From<indextree::NodeError> for LayoutError {
    fn from(err: indextree::NodeError) -> Self {
        LayoutError::InvalidEdit(err)
    }
}
