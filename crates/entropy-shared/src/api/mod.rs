mod forum;
mod orgchart;

pub use forum::*;
pub use orgchart::*;
