//! Form intake: the layer between raw form input and the ledger.
//!
//! The ledger trusts its caller to have checked consent and ID formats.
//! `FormIntake::submit` is that caller. It rejects a form without consent,
//! builds a typed `SignatureRequest`, checks the ID number against the
//! country registry, and only then appends.

use serde::{Deserialize, Serialize};
use tracing::debug;

use petition_contracts::{
    entry::{SignatureEntry, SignatureRequest},
    error::{PetitionError, PetitionResult},
};
use petition_ledger::SignatureLedger;

use crate::registry::CountryRegistry;

/// Raw signature form input as submitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureForm {
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub id_number: String,
    /// The signer confirmed citizenship and consented to data processing.
    #[serde(default)]
    pub consent: bool,
}

/// Validates forms against a country registry and appends them to a ledger.
#[derive(Debug, Clone)]
pub struct FormIntake {
    registry: CountryRegistry,
}

impl FormIntake {
    pub fn new(registry: CountryRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CountryRegistry {
        &self.registry
    }

    /// Validate `form` without touching any ledger.
    pub fn validate(&self, form: &SignatureForm) -> PetitionResult<SignatureRequest> {
        if !form.consent {
            return Err(PetitionError::ConsentMissing);
        }

        let request = SignatureRequest::new(
            form.first_name.as_str(),
            form.last_name.as_str(),
            form.country.trim().to_ascii_uppercase(),
            form.id_number.as_str(),
        )?;
        self.registry
            .validate_id(request.country(), request.id_number())?;

        Ok(request)
    }

    /// Validate `form` and append it to `ledger`.
    ///
    /// Validation failures leave the ledger untouched.
    pub fn submit(
        &self,
        ledger: &SignatureLedger,
        form: &SignatureForm,
    ) -> PetitionResult<SignatureEntry> {
        let request = self.validate(form).map_err(|e| {
            debug!(country = %form.country, error = %e, "signature form rejected");
            e
        })?;
        ledger.add_signature(request)
    }
}
