/// Row models
///
/// Plain records read from storage and serialized verbatim into responses.
///
/// - `user`: staff accounts and roles
/// - `bed`: beds and their occupancy status
/// - `department`: hospital departments

pub mod bed;
pub mod department;
pub mod user;
