/*
 * Java Harness Emitter
 *
 * Renders a driver procedure as two Java sources for analyzers that take a
 * main class:
 *
 * - Stubs class: one static field per stand-in, initialized in arena order
 *   (dependencies first), plus the framework entry points app code reaches
 *   (`findViewById`, `getSystemService`, component getters, XML handlers)
 * - Harness class: the entry method. Every stand-in is hoisted into a
 *   local, then the ordered sections run top to bottom and the unordered
 *   section runs as a loop over a nondeterministic switch
 *
 * Every load and every call sits in its own try/catch, so one throwing
 * path never hides the calls after it.
 */

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::EmitConfig;
use crate::errors::Result;
use crate::features::driver::domain::{CallStep, DriverProcedure, Section, SectionKind};
use crate::features::facts::ComponentKind;
use crate::features::standin::{Construction, StandIn, StandInOrigin, StandInRef};
use crate::shared::models::{MethodSignature, TypeName};

const INDENT: &str = "    ";
const CATCH: &str = "catch (Throwable __fault) {}";

/// Line-oriented source buffer
#[derive(Debug, Default)]
struct JavaWriter {
    out: String,
    depth: usize,
}

impl JavaWriter {
    fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(INDENT);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    fn open(&mut self, text: impl AsRef<str>) {
        self.line(format!("{} {{", text.as_ref()));
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    fn guarded(&mut self, statement: impl AsRef<str>) {
        self.line(format!("try {{ {} }} {}", statement.as_ref(), CATCH));
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Java source emitter
#[derive(Debug, Clone)]
pub struct JavaHarnessEmitter {
    config: EmitConfig,
}

impl JavaHarnessEmitter {
    pub fn new(config: EmitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EmitConfig {
        &self.config
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Harness class
    // ═══════════════════════════════════════════════════════════════════════

    pub fn emit_harness(&self, procedure: &DriverProcedure) -> String {
        let (package, class) = split_class(&self.config.harness_class);
        let stubs = &self.config.stubs_class;
        let mut w = JavaWriter::default();

        if let Some(package) = package {
            w.line(format!("package {};", package));
            w.line("");
        }
        w.open(format!("public class {}", class));
        w.line("");
        w.open(format!("public static void {}()", procedure.name()));

        // Hoisted stand-ins
        for stand_in in procedure.allocations() {
            w.line(format!(
                "{} {} = {};",
                stand_in.type_name,
                stand_in.label,
                default_literal(&stand_in.type_name)
            ));
        }
        for stand_in in procedure.allocations() {
            w.guarded(format!("{} = {}.{};", stand_in.label, stubs, stand_in.label));
        }

        for section in procedure.sections() {
            w.line("");
            match section.kind {
                SectionKind::Ordered => {
                    w.line(format!("// {}", section.label));
                    for step in &section.steps {
                        w.guarded(call_statement(procedure, step));
                    }
                }
                SectionKind::Unordered { passes } => {
                    self.emit_unordered(&mut w, procedure, section, passes);
                }
            }
        }

        w.close();
        w.close();
        w.finish()
    }

    fn emit_unordered(
        &self,
        w: &mut JavaWriter,
        procedure: &DriverProcedure,
        section: &Section,
        passes: usize,
    ) {
        let n = section.steps.len();
        w.line(format!("// {}: any order, any subset", section.label));
        w.open(format!(
            "for (int __pass = 0; __pass < {}; __pass++)",
            passes * n
        ));
        w.open(format!(
            "switch ({}.nondet({}))",
            self.config.stubs_class, n
        ));
        for (index, step) in section.steps.iter().enumerate() {
            w.line(format!(
                "case {}: try {{ {} }} {} break;",
                index,
                call_statement(procedure, step),
                CATCH
            ));
        }
        w.line("default: break;");
        w.close();
        w.close();
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Stubs class
    // ═══════════════════════════════════════════════════════════════════════

    pub fn emit_stubs(&self, procedure: &DriverProcedure) -> String {
        let (package, class) = split_class(&self.config.stubs_class);
        let stand_ins = procedure.allocations();
        let mut w = JavaWriter::default();

        if let Some(package) = package {
            w.line(format!("package {};", package));
            w.line("");
        }
        w.open(format!("public class {}", class));
        w.line("");

        for stand_in in stand_ins {
            w.line(format!("public static {} {};", stand_in.type_name, stand_in.label));
        }
        w.line("");

        // Initialization in dependency order; degenerate stand-ins stay null
        w.open("static");
        for stand_in in stand_ins {
            if let Some(init) = initializer(stand_ins, stand_in) {
                w.guarded(format!("{} = {};", stand_in.label, init));
            }
        }
        w.close();

        self.emit_view_lookup(&mut w, procedure);
        self.emit_system_services(&mut w, procedure);
        self.emit_component_getters(&mut w, procedure);
        self.emit_xml_callbacks(&mut w, procedure);

        w.line("");
        // Opaque to constant folding; any case may be taken on a concrete run
        w.open("public static int nondet(int bound)");
        w.line("if (bound <= 0) return 0;");
        w.line("return Math.floorMod((int) System.nanoTime(), bound);");
        w.close();

        w.close();
        w.finish()
    }

    fn emit_view_lookup(&self, w: &mut JavaWriter, procedure: &DriverProcedure) {
        let registry = procedure.registry();
        let fallback = procedure
            .allocations()
            .iter()
            .find(|s| s.origin == StandInOrigin::Unresolved { id: None } && s.type_name == TypeName::view())
            .map_or("null", |s| s.label.as_str());

        let identifiers = registry.identifiers();
        w.line("");
        w.open("public static android.view.View findViewById(int id)");
        w.open("switch (id)");
        for &(id, stand_in) in &identifiers {
            let stand_in = registry.get(stand_in);
            // Layout fragments alias component instances, not views
            if !stand_in.is_component() {
                w.line(format!("case {}: return {};", id as i32, stand_in.label));
            }
        }
        w.line(format!("default: return {};", fallback));
        w.close();
        w.close();

        w.line("");
        w.open("public static android.view.View inflateViewById(int id, android.content.Context ctx)");
        w.line("return findViewById(id);");
        w.close();

        for &(id, stand_in) in &identifiers {
            let stand_in = registry.get(stand_in);
            w.line("");
            w.open(format!("public static {} getView{}()", stand_in.type_name, id));
            w.line(format!("return {};", stand_in.label));
            w.close();
        }
    }

    fn emit_system_services(&self, w: &mut JavaWriter, procedure: &DriverProcedure) {
        let registry = procedure.registry();
        w.line("");
        w.open("public static Object getSystemService(String name)");
        w.open("switch (name)");
        for (name, ty) in registry.catalog().services() {
            if let Some(stand_in) = registry.lookup_ambient(ty) {
                w.line(format!(
                    "case \"{}\": return {};",
                    name,
                    registry.get(stand_in).label
                ));
            }
        }
        w.line("default: return null;");
        w.close();
        w.close();
    }

    fn emit_component_getters(&self, w: &mut JavaWriter, procedure: &DriverProcedure) {
        let registry = procedure.registry();
        for kind in ComponentKind::ALL {
            let (Some(getter), Some(supertype)) = (kind.stub_getter(), kind.framework_supertype()) else {
                continue;
            };
            w.line("");
            w.open(format!(
                "public static {} {}(String className)",
                supertype, getter
            ));
            w.open("switch (className)");
            for (decl, stand_in) in registry.components() {
                if decl.kind == kind {
                    w.line(format!(
                        "case \"{}\": return {};",
                        decl.name,
                        registry.get(stand_in).label
                    ));
                }
            }
            w.line("default: return null;");
            w.close();
            w.close();
        }
    }

    /// Dispatch for XML-declared handlers (`android:onClick`)
    fn emit_xml_callbacks(&self, w: &mut JavaWriter, procedure: &DriverProcedure) {
        let registry = procedure.registry();
        let mut seen: BTreeSet<(TypeName, MethodSignature)> = BTreeSet::new();

        w.line("");
        w.open("public static void callXMLRegisteredCallback(android.content.Context ctx, android.view.View v)");
        for step in procedure.ordered_steps().filter(|s| s.origin.is_handler()) {
            if !seen.insert((step.component.clone(), step.method.clone())) {
                continue;
            }
            let args: Vec<String> = step
                .args
                .iter()
                .map(|arg| {
                    if arg.param == TypeName::view() {
                        "v".to_string()
                    } else {
                        registry.get(arg.value).label.clone()
                    }
                })
                .collect();
            let receiver = registry.get(step.receiver);
            let is_context = matches!(
                receiver.origin,
                StandInOrigin::Component { component }
                    if component.assignable_framework_types().contains(&"android.content.Context")
            );
            let call = format!("{}({})", step.method.name, args.join(", "));
            if is_context {
                w.guarded(format!(
                    "if (ctx instanceof {c}) (({c}) ctx).{call};",
                    c = step.component,
                    call = call
                ));
            } else {
                w.guarded(format!("{}.{};", receiver.label, call));
            }
        }
        w.close();
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Files
    // ═══════════════════════════════════════════════════════════════════════

    /// Write both classes under `dir` in package directories
    pub fn write_sources(&self, procedure: &DriverProcedure, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let mut written = Vec::with_capacity(2);
        for (class, source) in [
            (&self.config.harness_class, self.emit_harness(procedure)),
            (&self.config.stubs_class, self.emit_stubs(procedure)),
        ] {
            let path = dir.join(format!("{}.java", class.replace('.', "/")));
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, source)?;
            debug!("wrote {}", path.display());
            written.push(path);
        }
        info!("emitted {} Java sources to {}", written.len(), dir.display());
        Ok(written)
    }

    /// The procedure as a JSON artifact
    pub fn emit_json(&self, procedure: &DriverProcedure) -> Result<String> {
        Ok(serde_json::to_string_pretty(procedure)?)
    }
}

fn split_class(qualified: &str) -> (Option<&str>, &str) {
    match qualified.rsplit_once('.') {
        Some((package, class)) => (Some(package), class),
        None => (None, qualified),
    }
}

/// `receiver.method(args);` with stand-in labels
fn call_statement(procedure: &DriverProcedure, step: &CallStep) -> String {
    let registry = procedure.registry();
    call_expression(step, |r| registry.get(r).label.clone())
}

fn call_expression(step: &CallStep, label: impl Fn(StandInRef) -> String) -> String {
    let args: Vec<String> = step.args.iter().map(|arg| label(arg.value)).collect();
    format!("{}.{}({});", label(step.receiver), step.method.name, args.join(", "))
}

/// Right-hand side initializing a stubs field, `None` for degenerate stand-ins
fn initializer(stand_ins: &[StandIn], stand_in: &StandIn) -> Option<String> {
    let label = |r: &StandInRef| stand_ins[r.index()].label.as_str();
    let args = |args: &[StandInRef]| args.iter().map(label).collect::<Vec<_>>().join(", ");

    let init = match &stand_in.construction {
        Construction::Degenerate => return None,
        Construction::Constructor { args: a } => format!("new {}({})", stand_in.type_name, args(a)),
        Construction::StaticFactory { owner, method, args: a } => {
            format!("{}.{}({})", owner, method, args(a))
        }
        Construction::StaticField { owner, field } => format!("{}.{}", owner, field),
        Construction::Accessor { receiver, method } => format!("{}.{}()", label(receiver), method),
        Construction::Array { element, length } => {
            let base = element.as_str().trim_end_matches("[]");
            let dims = (element.as_str().len() - base.len()) / 2;
            format!("new {}[{}]{}", base, length, "[]".repeat(dims))
        }
        Construction::DefaultValue => value_literal(&stand_in.type_name),
    };
    Some(init)
}

/// Literal a hoisted local starts from
fn default_literal(ty: &TypeName) -> &'static str {
    if ty.as_str() == "boolean" {
        "false"
    } else if ty.is_primitive() {
        "0"
    } else {
        "null"
    }
}

/// Zero value of a primitive, box or string
fn value_literal(ty: &TypeName) -> String {
    let literal = match ty.as_str() {
        "boolean" => "false",
        "java.lang.Boolean" => "Boolean.FALSE",
        "java.lang.Character" => "Character.valueOf((char) 0)",
        "java.lang.Byte" => "Byte.valueOf((byte) 0)",
        "java.lang.Short" => "Short.valueOf((short) 0)",
        "java.lang.Integer" => "Integer.valueOf(0)",
        "java.lang.Long" => "Long.valueOf(0L)",
        "java.lang.Float" => "Float.valueOf(0f)",
        "java.lang.Double" => "Double.valueOf(0d)",
        _ if ty.is_string() => "\"\"",
        _ if ty.is_primitive() => "0",
        _ => "null",
    };
    literal.to_string()
}
