use crate::config::SolrConfig;
use crate::document::Document;
use crate::error::{SolrError, SolrResult};
use crate::protocol::Protocol;
use crate::search::parameter::{LimitParameter, Parameter};
use crate::search::request::RequestPayload;

/// Turns a parameter list into a wire payload for one protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestBuilder {
    protocol: Protocol,
    default_limit: Option<u64>,
}

impl RequestBuilder {
    pub fn new(protocol: Protocol) -> Self {
        Self {
            protocol,
            default_limit: None,
        }
    }

    pub fn from_config(config: &SolrConfig) -> Self {
        Self::new(config.protocol).with_default_limit(config.default_limit)
    }

    /// Page size applied when the parameters carry no limit of their own
    pub fn with_default_limit(mut self, limit: Option<u64>) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Validate every parameter, then execute them in declaration order
    ///
    /// Nothing is executed unless the whole list validates, and no payload is
    /// returned if any execution fails.
    pub fn build<D: Document>(&self, parameters: &[Parameter<D>]) -> SolrResult<RequestPayload> {
        check_instances(parameters)?;
        validate_parameters(parameters)?;

        let mut payload = RequestPayload::new(self.protocol);
        for parameter in parameters {
            parameter.execute(&mut payload)?;
        }

        if let Some(limit) = self.default_limit {
            if !parameters.iter().any(|p| matches!(p, Parameter::Limit(_))) {
                Parameter::<D>::Limit(LimitParameter::configure(limit)?).execute(&mut payload)?;
            }
        }

        if let RequestPayload::Params(fragments) = &mut payload {
            fragments.push("wt=json".to_string());
        }

        tracing::debug!(
            protocol = %self.protocol,
            parameters = parameters.len(),
            "Built search request"
        );

        Ok(payload)
    }
}

/// Run every parameter's semantic check; the first failure aborts
pub fn validate_parameters<D: Document>(parameters: &[Parameter<D>]) -> SolrResult<()> {
    for parameter in parameters {
        let validation = parameter.validate();
        if !validation.is_valid {
            tracing::debug!(
                parameter = parameter.name(),
                message = %validation.message,
                "Parameter failed validation"
            );
            return Err(SolrError::ValidationFailed(validation.message));
        }
    }
    Ok(())
}

/// Single-instance parameters may appear at most once
pub fn check_instances<D: Document>(parameters: &[Parameter<D>]) -> SolrResult<()> {
    for (index, parameter) in parameters.iter().enumerate() {
        if parameter.allows_multiple_instances() {
            continue;
        }
        if parameters[..index]
            .iter()
            .any(|earlier| earlier.name() == parameter.name())
        {
            return Err(SolrError::DuplicateParameter(parameter.name()));
        }
    }
    Ok(())
}
