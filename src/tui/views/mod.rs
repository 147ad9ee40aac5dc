pub mod alert;
pub mod collections;
pub mod detail_modal;
pub mod password_modal;
pub mod scrape_form;
pub mod search_form;
