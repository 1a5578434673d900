use crate::scraper::{HttpResponse, ScraperError, Transport};
use std::cell::RefCell;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RecordedCall {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

struct Route {
    method: &'static str,
    needle: String,
    response: HttpResponse,
}

/// Frozen network layer: canned responses picked by method and a substring of
/// "url body". Unmatched requests get a 404 with an empty body.
#[derive(Default)]
pub struct StubTransport {
    routes: Vec<Route>,
    pub calls: RefCell<Vec<RecordedCall>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_get(mut self, needle: &str, status: u16, body: &str) -> Self {
        self.routes.push(Route {
            method: "GET",
            needle: needle.to_string(),
            response: HttpResponse {
                status,
                body: body.to_string(),
            },
        });
        self
    }

    pub fn on_post(mut self, needle: &str, status: u16, body: &str) -> Self {
        self.routes.push(Route {
            method: "POST",
            needle: needle.to_string(),
            response: HttpResponse {
                status,
                body: body.to_string(),
            },
        });
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn answer(
        &self,
        method: &'static str,
        url: &str,
        headers: &[(&str, &str)],
        body: Option<&str>,
    ) -> HttpResponse {
        self.calls.borrow_mut().push(RecordedCall {
            method,
            url: url.to_string(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.map(str::to_string),
        });

        let haystack = format!("{url} {}", body.unwrap_or_default());
        self.routes
            .iter()
            .find(|r| r.method == method && haystack.contains(&r.needle))
            .map(|r| r.response.clone())
            .unwrap_or(HttpResponse {
                status: 404,
                body: String::new(),
            })
    }
}

impl Transport for StubTransport {
    fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, ScraperError> {
        Ok(self.answer("GET", url, headers, None))
    }

    fn post_form(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<HttpResponse, ScraperError> {
        Ok(self.answer("POST", url, headers, Some(body)))
    }
}

/// eBay result page with one card per `(title, price text)`.
pub fn ebay_page(items: &[(&str, &str)]) -> String {
    let cards: String = items
        .iter()
        .enumerate()
        .map(|(i, (title, price))| {
            format!(
                r#"<li class="s-item" data-viewport='{{"trackableId":"{i}"}}'>
                     <div class="s-item__wrapper">
                       <div class="s-item__info">
                         <a class="s-item__link"><div class="s-item__title"><span>{title}</span></div></a>
                         <div class="s-item__details"><span class="s-item__price">{price}</span></div>
                       </div>
                     </div>
                   </li>"#
            )
        })
        .collect();

    format!(r#"<html><body><ul class="srp-results">{cards}</ul></body></html>"#)
}

/// Sold-history envelope whose `body` is the JSON-encoded `entries`.
pub fn sales_envelope(entries: serde_json::Value) -> String {
    serde_json::json!({ "status": 200, "body": entries.to_string() }).to_string()
}
