pub mod safety;
pub mod triage;
