mod candidate_form;
mod candidate_list;
mod github_search;
mod profile;

pub use candidate_form::CandidateFormView;
pub use candidate_list::CandidateListView;
pub use github_search::GitHubSearchView;
pub use profile::ProfileView;
