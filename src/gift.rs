//! Gift file availability probe
//!
//! The letter screen offers a download only if the gift file is actually
//! served. A `HEAD` request decides; servers that reject `HEAD` (405/501) or
//! fail it outright get a second chance with `GET`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What the letter screen shows under the envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GiftStatus {
    /// Probe in flight; the link is shown optimistically
    #[default]
    Checking,
    Available,
    Missing,
}

impl GiftStatus {
    /// Whether the download link should be visible
    pub fn shows_link(&self) -> bool {
        !matches!(self, GiftStatus::Missing)
    }
}

/// HTTP method used by the probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Head,
    Get,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Head => "HEAD",
            Method::Get => "GET",
        }
    }
}

/// Why a single request produced no status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// Request failed before a response arrived
    Network(String),
    /// Cancelled because the card moved on or was torn down
    Aborted,
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::Network(msg) => write!(f, "network error: {}", msg),
            ProbeError::Aborted => write!(f, "probe aborted"),
        }
    }
}

impl std::error::Error for ProbeError {}

/// Outcome of the `HEAD` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadVerdict {
    Available,
    Missing,
    /// Method not supported, ask again with `GET`
    RetryWithGet,
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

pub fn classify_head(status: u16) -> HeadVerdict {
    match status {
        s if is_success(s) => HeadVerdict::Available,
        405 | 501 => HeadVerdict::RetryWithGet,
        _ => HeadVerdict::Missing,
    }
}

pub fn classify_get(status: u16) -> GiftStatus {
    if is_success(status) {
        GiftStatus::Available
    } else {
        GiftStatus::Missing
    }
}

/// Base URL (with a trailing slash ensured) plus the encoded file name
pub fn gift_url(base: &str, file_name: &str) -> String {
    let encoded = urlencoding::encode(file_name);
    if base.ends_with('/') {
        format!("{}{}", base, encoded)
    } else {
        format!("{}/{}", base, encoded)
    }
}

/// Run the HEAD -> GET probe on top of any status fetcher.
///
/// Returns `Err(ProbeError::Aborted)` only when a request was cancelled;
/// every other failure ends as [`GiftStatus::Missing`].
pub async fn probe<F, Fut>(mut fetch: F) -> Result<GiftStatus, ProbeError>
where
    F: FnMut(Method) -> Fut,
    Fut: Future<Output = Result<u16, ProbeError>>,
{
    match fetch(Method::Head).await {
        Ok(status) => match classify_head(status) {
            HeadVerdict::Available => return Ok(GiftStatus::Available),
            HeadVerdict::Missing => return Ok(GiftStatus::Missing),
            HeadVerdict::RetryWithGet => {
                log::debug!("HEAD returned {}, retrying with GET", status);
            }
        },
        Err(ProbeError::Aborted) => return Err(ProbeError::Aborted),
        Err(e) => log::debug!("HEAD failed ({}), retrying with GET", e),
    }

    match fetch(Method::Get).await {
        Ok(status) => Ok(classify_get(status)),
        Err(ProbeError::Aborted) => Err(ProbeError::Aborted),
        Err(e) => {
            log::warn!("Gift probe failed: {}", e);
            Ok(GiftStatus::Missing)
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{ProbeHandle, spawn_probe};

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{AbortController, AbortSignal, Request, RequestCache, RequestInit, Response};

    use super::{GiftStatus, Method, ProbeError, probe};

    /// In-flight probe; dropping it aborts the requests
    pub struct ProbeHandle {
        controller: AbortController,
    }

    impl Drop for ProbeHandle {
        fn drop(&mut self) {
            self.controller.abort();
        }
    }

    async fn fetch_status(
        url: &str,
        method: Method,
        signal: &AbortSignal,
    ) -> Result<u16, ProbeError> {
        let init = RequestInit::new();
        init.set_method(method.as_str());
        init.set_cache(RequestCache::NoStore);
        init.set_signal(Some(signal));

        let request = Request::new_with_str_and_init(url, &init)
            .map_err(|e| ProbeError::Network(format!("{:?}", e)))?;
        let window =
            web_sys::window().ok_or_else(|| ProbeError::Network("no window".to_string()))?;

        let value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| {
                if signal.aborted() {
                    ProbeError::Aborted
                } else {
                    ProbeError::Network(format!("{:?}", e))
                }
            })?;
        let response: Response = value
            .dyn_into()
            .map_err(|_| ProbeError::Network("not a Response".to_string()))?;
        Ok(response.status())
    }

    /// Start probing `url`; `on_done` runs unless the handle is dropped first
    pub fn spawn_probe(
        url: String,
        on_done: impl FnOnce(GiftStatus) + 'static,
    ) -> Option<ProbeHandle> {
        let controller = match AbortController::new() {
            Ok(c) => c,
            Err(e) => {
                log::warn!("AbortController unavailable: {:?}", e);
                return None;
            }
        };
        let signal = controller.signal();

        wasm_bindgen_futures::spawn_local(async move {
            let result = probe(|method| {
                let url = url.clone();
                let signal = signal.clone();
                async move { fetch_status(&url, method, &signal).await }
            })
            .await;

            match result {
                Ok(status) if !signal.aborted() => {
                    log::info!("Gift {} is {:?}", url, status);
                    on_done(status);
                }
                Ok(_) | Err(ProbeError::Aborted) => log::debug!("Gift probe cancelled"),
                Err(e) => log::warn!("Gift probe error: {}", e),
            }
        });

        Some(ProbeHandle { controller })
    }
}
