//! Checking tokens carried in request parameters.
//!
//! Hosts typically submit the token as a form field or query parameter. These
//! helpers pull it out of an already-parsed parameter map and turn an invalid
//! outcome into an error the host can reject the request with.

use crate::nonce::engine::NonceEngine;
use crate::nonce::error::NonceError;
use crate::nonce::token::{Action, Verification};
use std::collections::{BTreeMap, HashMap};

/// Parameter name used for form and link tokens.
pub const DEFAULT_QUERY_ARG: &str = "_wpnonce";

/// Parameter name checked first for background (AJAX) requests.
pub const AJAX_QUERY_ARG: &str = "_ajax_nonce";

/// Read access to a request's decoded parameters.
pub trait RequestParams {
    /// Value of the parameter `name`, if present.
    fn get(&self, name: &str) -> Option<&str>;
}

impl RequestParams for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<&str> {
        HashMap::get(self, name).map(String::as_str)
    }
}

impl RequestParams for BTreeMap<String, String> {
    fn get(&self, name: &str) -> Option<&str> {
        BTreeMap::get(self, name).map(String::as_str)
    }
}

impl<P: RequestParams + ?Sized> RequestParams for &P {
    fn get(&self, name: &str) -> Option<&str> {
        (**self).get(name)
    }
}

impl NonceEngine {
    /// Verifies the token a form or admin link submitted.
    ///
    /// Reads `query_arg` (default [`DEFAULT_QUERY_ARG`]) from `params`.
    ///
    /// # Errors
    ///
    /// - [`NonceError::MissingToken`] if the parameter is absent
    /// - [`NonceError::InvalidToken`] if the token does not verify
    ///
    /// # Example
    ///
    /// ```rust
    /// use action_nonce::{NonceEngine, StaticContext, Verification};
    /// use std::collections::HashMap;
    /// use std::sync::Arc;
    ///
    /// # fn example() -> Result<(), action_nonce::NonceError> {
    /// let engine = NonceEngine::builder(Arc::new(StaticContext::new(3, "s", "salt"))).build()?;
    /// let token = engine.create_token("trash-post_12");
    ///
    /// let mut params = HashMap::new();
    /// params.insert("_wpnonce".to_string(), token.into_string());
    ///
    /// let outcome = engine.check_admin_request(&params, "trash-post_12", None)?;
    /// assert_eq!(outcome, Verification::Fresh);
    /// # Ok(())
    /// # }
    /// ```
    pub fn check_admin_request<P: RequestParams + ?Sized>(
        &self,
        params: &P,
        action: impl Into<Action>,
        query_arg: Option<&str>,
    ) -> Result<Verification, NonceError> {
        let name = query_arg.unwrap_or(DEFAULT_QUERY_ARG);
        let token = params.get(name).ok_or_else(|| {
            tracing::warn!(param = name, "request carries no nonce token");
            NonceError::MissingToken(name.to_string())
        })?;
        self.accept(token, action.into())
    }

    /// Verifies the token a background request submitted.
    ///
    /// With `query_arg` set, only that parameter is read. Without it,
    /// [`AJAX_QUERY_ARG`] is tried first, then [`DEFAULT_QUERY_ARG`].
    ///
    /// # Errors
    ///
    /// - [`NonceError::MissingToken`] if no candidate parameter is present
    /// - [`NonceError::InvalidToken`] if the token does not verify
    pub fn check_ajax_request<P: RequestParams + ?Sized>(
        &self,
        params: &P,
        action: impl Into<Action>,
        query_arg: Option<&str>,
    ) -> Result<Verification, NonceError> {
        let token = match query_arg {
            Some(name) => params.get(name),
            None => params
                .get(AJAX_QUERY_ARG)
                .or_else(|| params.get(DEFAULT_QUERY_ARG)),
        };
        let Some(token) = token else {
            let name = query_arg.unwrap_or(AJAX_QUERY_ARG);
            tracing::warn!(param = name, "ajax request carries no nonce token");
            return Err(NonceError::MissingToken(name.to_string()));
        };
        self.accept(token, action.into())
    }

    fn accept(&self, token: &str, action: Action) -> Result<Verification, NonceError> {
        match self.verify_token(token, &action) {
            Verification::Invalid => {
                tracing::warn!(action = %action, "rejected request with invalid nonce token");
                Err(NonceError::InvalidToken)
            }
            outcome => Ok(outcome),
        }
    }
}
