mod access;
mod content;
mod reads;
mod thread;

pub use access::*;
pub use content::*;
pub use reads::*;
pub use thread::*;
