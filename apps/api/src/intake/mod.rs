// Intake: the wizard that collects resume text, target roles and the user
// category, plus resume file extraction.

pub mod handlers;
pub mod upload;
pub mod wizard;
