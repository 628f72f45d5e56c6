pub(crate) mod attempt_answers;
pub(crate) mod attempts;
pub(crate) mod choices;
pub(crate) mod courses;
pub(crate) mod enrollments;
pub(crate) mod exams;
pub(crate) mod lessons;
pub(crate) mod questions;
pub(crate) mod units;
pub(crate) mod users;
