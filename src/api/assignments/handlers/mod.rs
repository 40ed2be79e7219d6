mod answers;
mod complete;
mod retake;
mod status;

pub(super) use answers::{get_saved_answers, save_answer};
pub(super) use complete::complete_assignment;
pub(super) use retake::retake_assignment;
pub(super) use status::get_assignment;
