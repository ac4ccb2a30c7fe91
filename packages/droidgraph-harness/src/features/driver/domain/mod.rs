mod procedure;

pub use procedure::{
    ArgBinding, CallOrigin, CallStep, Diagnostic, DriverProcedure, Section, SectionKind,
    Severity, StepId,
};
