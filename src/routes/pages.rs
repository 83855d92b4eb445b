//! Bare HTML forms served on GET for the form routes.

use axum::response::Html;

fn form_page(title: &str, action: &str, fields: &[(&str, &str, &str)]) -> Html<String> {
    let inputs: String = fields
        .iter()
        .map(|(name, kind, label)| {
            format!(
                "<label>{label} <input name=\"{name}\" type=\"{kind}\" autocomplete=\"off\"></label><br>"
            )
        })
        .collect();
    Html(format!(
        "<!DOCTYPE html><html><head><title>{title}</title></head><body>\
         <h1>{title}</h1><form action=\"{action}\" method=\"post\">{inputs}\
         <button type=\"submit\">{title}</button></form></body></html>"
    ))
}

pub fn buy() -> Html<String> {
    form_page("Buy", "/buy", &[("symbol", "text", "Symbol"), ("shares", "number", "Shares")])
}

pub fn sell() -> Html<String> {
    form_page("Sell", "/sell", &[("symbol", "text", "Symbol"), ("shares", "number", "Shares")])
}

pub fn quote() -> Html<String> {
    form_page("Quote", "/quote", &[("symbol", "text", "Symbol")])
}

pub fn login() -> Html<String> {
    form_page(
        "Log In",
        "/login",
        &[("username", "text", "Username"), ("password", "password", "Password")],
    )
}

pub fn register() -> Html<String> {
    form_page(
        "Register",
        "/register",
        &[
            ("username", "text", "Username"),
            ("password", "password", "Password"),
            ("confirmation", "password", "Confirm password"),
        ],
    )
}
