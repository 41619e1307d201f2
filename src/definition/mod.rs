//! Test procedure definitions loaded from YAML.
//!
//! Every action, check and event parameter is passed through the variable expression
//! parser exactly once, while the definition is being built. Later consumers see either
//! a plain value or a [`ParameterValue::Variable`].

mod error;
mod parameters;
mod procedure;
mod value;

pub use error::DefinitionError;
pub use parameters::{
    ParameterSchema, ParameterType, Parameters, RawParameters, is_valid_parameter_type,
    resolve_parameters, validate_parameters,
};
pub use procedure::{
    Action, Check, Criteria, CsipAusVersion, Event, Preconditions, Step, TestProcedure,
};
pub use value::ParameterValue;
