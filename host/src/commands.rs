//! Request Dispatch - Turns request lines into service calls

use eqlink_core::{CallError, EqualizerService, MethodCall};
use tracing::{debug, error, warn};

use crate::Response;

/// Request line is not a JSON method call
pub const ERROR_INVALID_REQUEST: &str = "INVALID_REQUEST";

/// Arguments could not be decoded for the named method
pub const ERROR_INVALID_ARGUMENTS: &str = "INVALID_ARGUMENTS";

/// The control thread is gone
pub const ERROR_UNAVAILABLE: &str = "UNAVAILABLE";

pub(crate) fn dispatch_line(service: &EqualizerService, line: &str) -> Response {
    let call: MethodCall = match serde_json::from_str(line) {
        Ok(call) => call,
        Err(e) => {
            warn!("Malformed request: {}", e);
            return Response::error(ERROR_INVALID_REQUEST, e.to_string());
        }
    };

    dispatch(service, call)
}

pub(crate) fn dispatch(service: &EqualizerService, call: MethodCall) -> Response {
    debug!("Method call: {}", call.method);

    let command = match call.into_command() {
        Ok(command) => command,
        Err(CallError::NotImplemented(method)) => {
            warn!("Method not implemented: {}", method);
            return Response::NotImplemented;
        }
        Err(e @ CallError::InvalidArguments { .. }) => {
            warn!("{}", e);
            return Response::error(ERROR_INVALID_ARGUMENTS, e.to_string());
        }
    };

    match service.call(command) {
        Ok(result) => Response::Success { result },
        Err(e) => {
            error!("Equalizer service unavailable: {}", e);
            Response::error(ERROR_UNAVAILABLE, e.to_string())
        }
    }
}
