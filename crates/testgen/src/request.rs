use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;

/// Kind of tests to generate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    Unit,
    Integration,
    E2e,
    Performance,
}

/// Business domain the specification belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestDomain {
    Inventory,
    Finance,
    Logistics,
}

impl core::str::FromStr for TestType {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unit" => Ok(TestType::Unit),
            "integration" => Ok(TestType::Integration),
            "e2e" => Ok(TestType::E2e),
            "performance" => Ok(TestType::Performance),
            _ => Err(GeneratorError::InvalidRequest(
                "test_type must be one of: unit, integration, e2e, performance".to_string(),
            )),
        }
    }
}

impl core::str::FromStr for TestDomain {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "inventory" => Ok(TestDomain::Inventory),
            "finance" => Ok(TestDomain::Finance),
            "logistics" => Ok(TestDomain::Logistics),
            _ => Err(GeneratorError::InvalidRequest(
                "domain must be one of: inventory, finance, logistics".to_string(),
            )),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub test_type: TestType,
    pub domain: TestDomain,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            test_type: TestType::Unit,
            domain: TestDomain::Inventory,
        }
    }
}

/// A validated request: non-blank specification text plus configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    specification: String,
    config: GenerationConfig,
}

impl GenerationRequest {
    pub fn new(
        specification: impl Into<String>,
        config: GenerationConfig,
    ) -> Result<Self, GeneratorError> {
        let specification = specification.into();
        if specification.trim().is_empty() {
            return Err(GeneratorError::InvalidRequest(
                "specification cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            specification,
            config,
        })
    }

    pub fn specification(&self) -> &str {
        &self.specification
    }

    pub fn config(&self) -> GenerationConfig {
        self.config
    }
}
