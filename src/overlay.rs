use crate::constants::{HIDDEN_CLASS, ICE_BANNER_ID, ICE_BODY_CLASS};
use web_sys as web;

#[inline]
pub fn show_ice_banner(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(ICE_BANNER_ID) {
        _ = el.class_list().remove_1(HIDDEN_CLASS);
        // fallback for pages without the CSS class
        _ = el.set_attribute("style", "");
    }
    if let Some(body) = document.body() {
        _ = body.class_list().add_1(ICE_BODY_CLASS);
    }
}

#[inline]
pub fn hide_ice_banner(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(ICE_BANNER_ID) {
        _ = el.class_list().add_1(HIDDEN_CLASS);
        // fallback
        _ = el.set_attribute("style", "display:none");
    }
    if let Some(body) = document.body() {
        _ = body.class_list().remove_1(ICE_BODY_CLASS);
    }
}
