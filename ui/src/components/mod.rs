pub mod schema_form;
