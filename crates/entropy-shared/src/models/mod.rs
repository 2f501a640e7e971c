mod forum;
mod person;
mod transcript;

pub use forum::*;
pub use person::*;
pub use transcript::*;
