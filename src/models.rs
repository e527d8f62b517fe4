mod answer;
mod ids;
mod note;

pub use answer::{Answer, QaResult, Verdict};
pub use ids::NoteId;
pub use note::{Note, NoteBuilder};
