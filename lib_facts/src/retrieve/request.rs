use crate::api::Endpoint;

/// An immutable GET request against one endpoint, built once per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    endpoint: Endpoint,
    query: Vec<(String, String)>,
}

impl Request {
    /// A request without query parameters.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            query: Vec::new(),
        }
    }

    /// Appends a query parameter; parameters keep their insertion order.
    pub fn with_query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_parameters_keep_order() {
        let request = Request::new(Endpoint::GetFacts)
            .with_query("number", 3)
            .with_query("lang", "en");

        assert_eq!(request.endpoint(), Endpoint::GetFacts);
        assert_eq!(
            request.query(),
            &[("number".to_string(), "3".to_string()), ("lang".to_string(), "en".to_string())]
        );
    }
}
