// Gap filling: collects the sections the completeness check flagged and
// merges them back into the optimized resume.

pub mod form;
pub mod handlers;
