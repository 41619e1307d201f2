//! Test procedure document model.
//!
//! ## YAML Structure
//!
//! ```yaml
//! Description: Example procedure
//! Category: Example
//! Classes: [A]
//! TargetVersions: [v1.2]
//! Preconditions:
//!   actions:
//!     - type: set-default-der-control
//!       parameters:
//!         opModExpLimW: $(0.5 * setMaxW)
//! Steps:
//!   WAIT-FOR-DERC:
//!     event:
//!       type: GET-request-received
//!       parameters:
//!         endpoint: /derp/1/derc
//!     actions:
//!       - type: finish-test
//!         parameters: {}
//! Criteria:
//!   checks:
//!     - type: all-steps-complete
//!       parameters: {}
//! ```
//!
//! Loading is strict: unknown fields are rejected and a single malformed variable
//! expression fails the whole document.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use super::parameters::{
    ParameterSchema, Parameters, RawParameters, resolve_parameters, validate_parameters,
};
use super::DefinitionError;

// ============================================================================
// Actions, checks and events
// ============================================================================

/// Something the test harness does when a step is triggered.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub kind: String,
    pub parameters: Parameters,
}

impl Action {
    /// Builds an action, parsing any variable expressions held by `parameters`.
    pub fn new(kind: impl Into<String>, parameters: RawParameters) -> Result<Self, DefinitionError> {
        Ok(Self {
            kind: kind.into(),
            parameters: resolve_parameters(parameters)?,
        })
    }
}

/// Validation logic that provides a pass/fail status beyond the basic flow of a test
/// procedure (eg inspecting the history of requests to an endpoint).
#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    pub kind: String,
    pub parameters: Parameters,
}

impl Check {
    pub fn new(kind: impl Into<String>, parameters: RawParameters) -> Result<Self, DefinitionError> {
        Ok(Self {
            kind: kind.into(),
            parameters: resolve_parameters(parameters)?,
        })
    }
}

/// A trigger for a step. If `checks` are present they must all pass at the moment the
/// event fires, otherwise the trigger is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub kind: String,
    pub parameters: Parameters,
    pub checks: Option<Vec<Check>>,
}

impl Event {
    pub fn new(
        kind: impl Into<String>,
        parameters: RawParameters,
        checks: Option<Vec<Check>>,
    ) -> Result<Self, DefinitionError> {
        Ok(Self {
            kind: kind.into(),
            parameters: resolve_parameters(parameters)?,
            checks,
        })
    }
}

// ============================================================================
// Procedure structure
// ============================================================================

/// CSIP-AUS releases a test can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum CsipAusVersion {
    #[serde(rename = "v1.2")]
    Release1_2,
    #[serde(rename = "v1.3-beta/storage")]
    Beta1_3Storage,
}

impl CsipAusVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Release1_2 => "v1.2",
            Self::Beta1_3Storage => "v1.3-beta/storage",
        }
    }
}

/// Waits for `event` then runs `actions`. Steps commonly enable other steps so the
/// procedure can evolve in response to client behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub event: Event,
    pub actions: Vec<Action>,
    /// Out-of-band operations to perform during the step
    pub instructions: Option<Vec<String>>,
}

/// Setup run before a test starts.
///
/// `immediate_start` skips the pre-start phase entirely; don't combine it with checks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preconditions {
    pub init_actions: Option<Vec<Action>>,
    pub immediate_start: bool,
    pub actions: Option<Vec<Action>>,
    pub checks: Option<Vec<Check>>,
    pub instructions: Option<Vec<String>>,
}

/// Final pass/fail analysis run when the procedure completes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    pub checks: Option<Vec<Check>>,
}

/// Everything relevant to a single test procedure.
#[derive(Debug, Clone, PartialEq)]
pub struct TestProcedure {
    pub description: String,
    pub category: String,
    pub classes: Vec<String>,
    pub target_versions: Vec<CsipAusVersion>,
    /// Keyed by step name, in document order
    pub steps: IndexMap<String, Step>,
    pub preconditions: Option<Preconditions>,
    pub criteria: Option<Criteria>,
}

impl TestProcedure {
    /// Parses a test procedure from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, DefinitionError> {
        let raw: raw::TestProcedureDef = serde_yaml::from_str(yaml)?;
        let procedure = raw.into_model()?;
        debug!(
            description = %procedure.description,
            steps = procedure.steps.len(),
            "loaded test procedure"
        );
        Ok(procedure)
    }

    /// Reads and parses a test procedure YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, DefinitionError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&contents)
    }

    /// Every action in the procedure, labelled by where it appears.
    pub fn actions(&self) -> impl Iterator<Item = (String, &Action)> {
        let preconditions = self.preconditions.iter().flat_map(|p| {
            p.init_actions
                .iter()
                .chain(p.actions.iter())
                .flatten()
                .map(|a| ("Precondition".to_string(), a))
        });
        let steps = self
            .steps
            .iter()
            .flat_map(|(name, step)| step.actions.iter().map(move |a| (name.clone(), a)));
        preconditions.chain(steps)
    }

    /// Every check in the procedure, labelled by where it appears.
    pub fn checks(&self) -> impl Iterator<Item = (String, &Check)> {
        let criteria = self
            .criteria
            .iter()
            .flat_map(|c| c.checks.iter().flatten())
            .map(|c| ("Criteria".to_string(), c));
        let preconditions = self
            .preconditions
            .iter()
            .flat_map(|p| p.checks.iter().flatten())
            .map(|c| ("Preconditions".to_string(), c));
        let steps = self.steps.iter().flat_map(|(name, step)| {
            step.event
                .checks
                .iter()
                .flatten()
                .map(move |c| (format!("Step {name}"), c))
        });
        criteria.chain(preconditions).chain(steps)
    }

    /// Validates every action, check and event against the schemas returned by the lookups.
    ///
    /// A lookup returning `None` means the name is not a valid action/check/event. The
    /// schema tables themselves belong to the caller.
    pub fn validate_parameters<'s>(
        &self,
        procedure_id: &str,
        action_schema: impl Fn(&str) -> Option<&'s [(&'s str, ParameterSchema)]>,
        check_schema: impl Fn(&str) -> Option<&'s [(&'s str, ParameterSchema)]>,
        event_schema: impl Fn(&str) -> Option<&'s [(&'s str, ParameterSchema)]>,
    ) -> Result<(), DefinitionError> {
        for (location, action) in self.actions() {
            let location = format!("{procedure_id}.{location} Action: {}", action.kind);
            let schema = action_schema(&action.kind)
                .ok_or_else(|| DefinitionError::invalid(&location, "not a valid action name"))?;
            validate_parameters(&location, &action.parameters, schema)?;
        }

        for (location, check) in self.checks() {
            let location = format!("{procedure_id}: {location} Check: {}", check.kind);
            let schema = check_schema(&check.kind)
                .ok_or_else(|| DefinitionError::invalid(&location, "not a valid check name"))?;
            validate_parameters(&location, &check.parameters, schema)?;
        }

        for (name, step) in &self.steps {
            let location = format!("{procedure_id}.{name} Event: {}", step.event.kind);
            let schema = event_schema(&step.event.kind)
                .ok_or_else(|| DefinitionError::invalid(&location, "not a valid event name"))?;
            validate_parameters(&location, &step.event.parameters, schema)?;
        }

        Ok(())
    }
}

// ============================================================================
// Document conversion
// ============================================================================

impl raw::TestProcedureDef {
    fn into_model(self) -> Result<TestProcedure, DefinitionError> {
        let steps = self
            .steps
            .into_iter()
            .map(|(name, step)| Ok((name, step.into_model()?)))
            .collect::<Result<IndexMap<String, Step>, DefinitionError>>()?;

        Ok(TestProcedure {
            description: self.description,
            category: self.category,
            classes: self.classes,
            target_versions: self.target_versions,
            steps,
            preconditions: self.preconditions.map(|p| p.into_model()).transpose()?,
            criteria: self.criteria.map(|c| c.into_model()).transpose()?,
        })
    }
}

impl raw::StepDef {
    fn into_model(self) -> Result<Step, DefinitionError> {
        Ok(Step {
            event: self.event.into_model()?,
            actions: actions(self.actions)?,
            instructions: self.instructions,
        })
    }
}

impl raw::PreconditionsDef {
    fn into_model(self) -> Result<Preconditions, DefinitionError> {
        Ok(Preconditions {
            init_actions: self.init_actions.map(actions).transpose()?,
            immediate_start: self.immediate_start,
            actions: self.actions.map(actions).transpose()?,
            checks: self.checks.map(checks).transpose()?,
            instructions: self.instructions,
        })
    }
}

impl raw::CriteriaDef {
    fn into_model(self) -> Result<Criteria, DefinitionError> {
        Ok(Criteria {
            checks: self.checks.map(checks).transpose()?,
        })
    }
}

impl raw::EventDef {
    fn into_model(self) -> Result<Event, DefinitionError> {
        let checks = self.checks.map(checks).transpose()?;
        Event::new(self.kind, self.parameters, checks)
    }
}

fn actions(defs: Vec<raw::ParameterisedDef>) -> Result<Vec<Action>, DefinitionError> {
    defs.into_iter()
        .map(|def| Action::new(def.kind, def.parameters))
        .collect()
}

fn checks(defs: Vec<raw::ParameterisedDef>) -> Result<Vec<Check>, DefinitionError> {
    defs.into_iter()
        .map(|def| Check::new(def.kind, def.parameters))
        .collect()
}

/// Document shape as deserialized by serde, before expression substitution.
mod raw {
    use indexmap::IndexMap;
    use serde::Deserialize;

    use super::CsipAusVersion;
    use crate::definition::parameters::RawParameters;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "PascalCase", deny_unknown_fields)]
    pub struct TestProcedureDef {
        pub description: String,
        pub category: String,
        pub classes: Vec<String>,
        pub target_versions: Vec<CsipAusVersion>,
        pub steps: IndexMap<String, StepDef>,
        #[serde(default)]
        pub preconditions: Option<PreconditionsDef>,
        #[serde(default)]
        pub criteria: Option<CriteriaDef>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct StepDef {
        pub event: EventDef,
        pub actions: Vec<ParameterisedDef>,
        #[serde(default)]
        pub instructions: Option<Vec<String>>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct PreconditionsDef {
        #[serde(default)]
        pub init_actions: Option<Vec<ParameterisedDef>>,
        #[serde(default)]
        pub immediate_start: bool,
        #[serde(default)]
        pub actions: Option<Vec<ParameterisedDef>>,
        #[serde(default)]
        pub checks: Option<Vec<ParameterisedDef>>,
        #[serde(default)]
        pub instructions: Option<Vec<String>>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct CriteriaDef {
        #[serde(default)]
        pub checks: Option<Vec<ParameterisedDef>>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct EventDef {
        #[serde(rename = "type")]
        pub kind: String,
        #[serde(default)]
        pub parameters: RawParameters,
        #[serde(default)]
        pub checks: Option<Vec<ParameterisedDef>>,
    }

    /// An action or check: a type name plus its parameters.
    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct ParameterisedDef {
        #[serde(rename = "type")]
        pub kind: String,
        #[serde(default)]
        pub parameters: RawParameters,
    }
}
