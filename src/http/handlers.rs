use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{debug, warn};

use super::AdminApp;
use crate::controller::{ControllerResponse, TransitionRequest};
use crate::error::ControllerError;
use crate::flash::{FlashBag, FlashType};
use crate::i18n::Translator;
use crate::menu::MenuItem;
use crate::workflow::Subject;

pub const FLASH_SUCCESS_HEADER: &str = "x-flash-success";
pub const FLASH_ERROR_HEADER: &str = "x-flash-error";

#[derive(Debug, Serialize)]
pub struct ListView<S> {
    pub action: &'static str,
    pub objects: Vec<S>,
    pub menu: MenuItem,
}

#[derive(Debug, Serialize)]
pub struct ObjectView<S> {
    pub action: &'static str,
    pub object: S,
    pub menu: MenuItem,
}

impl IntoResponse for ControllerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ControllerError::NotFound { .. } => StatusCode::NOT_FOUND,
            ControllerError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ControllerError::AccessDenied { .. } => StatusCode::FORBIDDEN,
            ControllerError::ModelManager(_) | ControllerError::Workflow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Some(source) = std::error::Error::source(&self) {
            debug!(error = %self, %source, "controller error");
        }
        (status, self.to_string()).into_response()
    }
}

/// GET/POST `{base}/{id}/workflow/transition/{transition}/apply`
pub async fn apply_transition<S: Subject>(
    State(app): State<Arc<AdminApp<S>>>,
    Path(params): Path<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let request = TransitionRequest {
        id: params.get(&app.admin.id_parameter()).cloned().unwrap_or_default(),
        transition: params.get("transition").filter(|t| !t.is_empty()).cloned(),
        xml_http_request: is_xml_http_request(&headers),
    };

    let mut flashes = FlashBag::new();
    match app.controller.apply_transition(&request, &mut flashes) {
        Ok(response) => {
            let mut response = controller_response(response);
            append_flashes(response.headers_mut(), &flashes, app.translator.as_ref());
            response
        }
        Err(err) => err.into_response(),
    }
}

pub async fn list_view<S: Subject + Serialize>(State(app): State<Arc<AdminApp<S>>>) -> Json<ListView<S>> {
    Json(ListView {
        action: "list",
        objects: app.admin.list(),
        menu: app.tab_menu("list", None),
    })
}

pub async fn show_view<S: Subject + Serialize>(
    State(app): State<Arc<AdminApp<S>>>,
    Path(params): Path<HashMap<String, String>>,
) -> Response {
    object_view(&app, &params, "show")
}

pub async fn edit_view<S: Subject + Serialize>(
    State(app): State<Arc<AdminApp<S>>>,
    Path(params): Path<HashMap<String, String>>,
) -> Response {
    object_view(&app, &params, "edit")
}

fn object_view<S: Subject + Serialize>(
    app: &AdminApp<S>,
    params: &HashMap<String, String>,
    action: &'static str,
) -> Response {
    let id = params.get(&app.admin.id_parameter()).map(String::as_str).unwrap_or_default();
    let Some(object) = app.admin.object(id) else {
        return ControllerError::not_found(format!("unable to find the object with id: {id}")).into_response();
    };
    app.admin.bind_subject(&object);

    let menu = app.tab_menu(action, Some(&object));
    Json(ObjectView { action, object, menu }).into_response()
}

fn is_xml_http_request(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .is_some_and(|value| value.as_bytes() == b"XMLHttpRequest")
}

fn controller_response(response: ControllerResponse) -> Response {
    match response {
        ControllerResponse::Redirect(location) => match HeaderValue::from_str(&location) {
            Ok(location) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
            Err(err) => {
                warn!(%location, error = %err, "redirect location is not a valid header value");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        },
        ControllerResponse::Json(applied) => Json(applied).into_response(),
        ControllerResponse::Content { status, body } => (status, body).into_response(),
    }
}

/// Renders each flash message as one `x-flash-success` / `x-flash-error` header.
fn append_flashes(headers: &mut HeaderMap, flashes: &FlashBag, translator: &dyn Translator) {
    for (kind, message) in flashes.iter() {
        let name = match kind {
            FlashType::Success => HeaderName::from_static(FLASH_SUCCESS_HEADER),
            FlashType::Error => HeaderName::from_static(FLASH_ERROR_HEADER),
        };
        let text = message.trans(translator);
        match HeaderValue::from_str(&text) {
            Ok(value) => {
                headers.append(name, value);
            }
            Err(_) => warn!(flash = %kind, %text, "flash message is not a valid header value, dropped"),
        }
    }
}
