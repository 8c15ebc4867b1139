pub mod muscle;
pub mod question;
pub mod quiz;

pub use muscle::{AttributeKind, Muscle, MuscleCategory, MuscleSubcategory};
pub use question::Question;
pub use quiz::Quiz;
