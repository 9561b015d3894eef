pub mod assignment_wizard;
pub mod assignments;
pub mod companies;
pub mod company_wizard;
pub mod components;
pub mod import_prompt;
pub mod map_view;
pub mod project_wizard;
pub mod projects;
pub mod record_list;
