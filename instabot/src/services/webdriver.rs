//! W3C WebDriver client
//!
//! Talks the WebDriver JSON wire protocol to a running driver server
//! (chromedriver, geckodriver, a Selenium grid) over blocking HTTP. One
//! client owns one browser session; the session is deleted on drop.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use shared::Phase;
use url::Url;

use crate::error::{InstabotError, InstabotResult};
use crate::traits::{ElementHandle, Locator, PageDriver};

/// Key under which the protocol returns element references
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Error payload of a failed command
#[derive(Debug, Deserialize)]
struct WireFailure {
    error: String,
    #[serde(default)]
    message: String,
}

impl WireFailure {
    fn is_no_such_element(&self) -> bool {
        self.error == "no such element"
    }

    fn into_error(self) -> InstabotError {
        InstabotError::driver(format!("{}: {}", self.error, self.message))
    }
}

/// Blocking WebDriver session
pub struct WebDriverClient {
    http: Client,
    base: Url,
    session_id: String,
}

impl WebDriverClient {
    /// Start a Chrome session on the driver server at `server`
    pub fn connect(server: &str) -> InstabotResult<Self> {
        Self::connect_with_capabilities(server, json!({ "browserName": "chrome" }))
    }

    /// Start a session with explicit `alwaysMatch` capabilities
    pub fn connect_with_capabilities(server: &str, capabilities: Value) -> InstabotResult<Self> {
        let mut base = Url::parse(server).map_err(|e| InstabotError::config(format!("webdriver_url: {e}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        // Page loads may block arbitrarily long; no client-side timeout.
        let http = Client::builder().timeout(None::<Duration>).build()?;

        let url = base
            .join("session")
            .map_err(|e| InstabotError::config(format!("webdriver_url: {e}")))?;
        let body = json!({ "capabilities": { "alwaysMatch": capabilities } });
        let value = Self::decode(http.post(url).json(&body).send()?)?.map_err(WireFailure::into_error)?;

        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| InstabotError::driver("new session response has no sessionId"))?
            .to_string();

        shared::phase_debug!(Phase::current(), "🌐 WebDriver session {} opened at {}", session_id, base);
        Ok(Self { http, base, session_id })
    }

    /// End the browser session. Later commands fail.
    pub fn quit(&mut self) -> InstabotResult<()> {
        if self.session_id.is_empty() {
            return Ok(());
        }
        self.command(Method::DELETE, "", None)?;
        shared::phase_debug!(Phase::current(), "WebDriver session {} closed", self.session_id);
        self.session_id.clear();
        Ok(())
    }

    /// Split a response into its `value` or the protocol failure
    fn decode(response: reqwest::blocking::Response) -> InstabotResult<Result<Value, WireFailure>> {
        let status = response.status();
        let mut payload: Value = response.json()?;
        let value = payload.get_mut("value").map(Value::take).unwrap_or(Value::Null);

        if status.is_success() {
            return Ok(Ok(value));
        }
        let failure = serde_json::from_value(value).unwrap_or_else(|_| WireFailure {
            error: status.to_string(),
            message: String::new(),
        });
        Ok(Err(failure))
    }

    /// Send a session command; transport errors are `Err`, protocol
    /// failures are `Ok(Err(..))`
    fn execute(&self, method: Method, path: &str, body: Option<Value>) -> InstabotResult<Result<Value, WireFailure>> {
        let endpoint = if path.is_empty() {
            format!("session/{}", self.session_id)
        } else {
            format!("session/{}/{}", self.session_id, path)
        };
        let url = self
            .base
            .join(&endpoint)
            .map_err(|e| InstabotError::driver(format!("bad endpoint {endpoint}: {e}")))?;

        let request = self.http.request(method, url);
        let request = match body {
            Some(body) => request.json(&body),
            None => request,
        };
        Self::decode(request.send()?)
    }

    fn command(&self, method: Method, path: &str, body: Option<Value>) -> InstabotResult<Value> {
        self.execute(method, path, body)?.map_err(WireFailure::into_error)
    }

    fn locator_body(locator: &Locator) -> Value {
        let (using, value) = match locator {
            Locator::Css(s) => ("css selector", s.clone()),
            Locator::XPath(s) => ("xpath", s.clone()),
            Locator::LinkText(s) => ("link text", s.clone()),
            Locator::PartialLinkText(s) => ("partial link text", s.clone()),
            Locator::Name(s) => ("css selector", format!("[name=\"{s}\"]")),
        };
        json!({ "using": using, "value": value })
    }

    fn element_from(value: &Value) -> InstabotResult<ElementHandle> {
        value
            .get(ELEMENT_KEY)
            .and_then(Value::as_str)
            .map(ElementHandle::new)
            .ok_or_else(|| InstabotError::driver(format!("not an element reference: {value}")))
    }

    fn elements_from(value: &Value) -> InstabotResult<Vec<ElementHandle>> {
        value
            .as_array()
            .ok_or_else(|| InstabotError::driver(format!("expected element list, got {value}")))?
            .iter()
            .map(Self::element_from)
            .collect()
    }
}

impl PageDriver for WebDriverClient {
    fn navigate(&self, url: &str) -> InstabotResult<()> {
        self.command(Method::POST, "url", Some(json!({ "url": url })))?;
        Ok(())
    }

    fn find_element(&self, locator: &Locator) -> InstabotResult<ElementHandle> {
        self.find_element_optional(locator)?
            .ok_or_else(|| InstabotError::ElementNotFound {
                locator: locator.to_string(),
            })
    }

    fn find_element_optional(&self, locator: &Locator) -> InstabotResult<Option<ElementHandle>> {
        match self.execute(Method::POST, "element", Some(Self::locator_body(locator)))? {
            Ok(value) => Self::element_from(&value).map(Some),
            Err(failure) if failure.is_no_such_element() => Ok(None),
            Err(failure) => Err(failure.into_error()),
        }
    }

    fn find_elements(&self, locator: &Locator) -> InstabotResult<Vec<ElementHandle>> {
        let value = self.command(Method::POST, "elements", Some(Self::locator_body(locator)))?;
        Self::elements_from(&value)
    }

    fn find_elements_within(&self, parent: &ElementHandle, locator: &Locator) -> InstabotResult<Vec<ElementHandle>> {
        let path = format!("element/{}/elements", parent.id);
        let value = self.command(Method::POST, &path, Some(Self::locator_body(locator)))?;
        Self::elements_from(&value)
    }

    fn text(&self, element: &ElementHandle) -> InstabotResult<String> {
        let value = self.command(Method::GET, &format!("element/{}/text", element.id), None)?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    fn attribute(&self, element: &ElementHandle, name: &str) -> InstabotResult<Option<String>> {
        let value = self.command(Method::GET, &format!("element/{}/attribute/{}", element.id, name), None)?;
        Ok(value.as_str().map(str::to_string))
    }

    fn click(&self, element: &ElementHandle) -> InstabotResult<()> {
        self.command(Method::POST, &format!("element/{}/click", element.id), Some(json!({})))?;
        Ok(())
    }

    fn send_keys(&self, element: &ElementHandle, text: &str) -> InstabotResult<()> {
        self.command(
            Method::POST,
            &format!("element/{}/value", element.id),
            Some(json!({ "text": text })),
        )?;
        Ok(())
    }

    fn run_script(&self, script: &str) -> InstabotResult<Value> {
        self.command(Method::POST, "execute/sync", Some(json!({ "script": script, "args": [] })))
    }

    fn wait_fixed(&self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

impl Drop for WebDriverClient {
    fn drop(&mut self) {
        if let Err(e) = self.quit() {
            shared::phase_debug!(Phase::current(), "Failed to close WebDriver session: {}", e);
        }
    }
}
