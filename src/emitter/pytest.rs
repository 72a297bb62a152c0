//! Pytest source rendering for generated modules.

use super::{GeneratedModule, GeneratedTest, TestTarget};
use crate::core::{AssertionCase, Expected, Literal, SymbolKind};
use std::fmt::{self, Write};

const INDENT: &str = "    ";

/// Every exception and warning class in Python's `builtins` module,
/// including the `OSError` aliases.
const BUILTIN_EXCEPTIONS: &[&str] = &[
    "BaseException",
    "BaseExceptionGroup",
    "GeneratorExit",
    "KeyboardInterrupt",
    "SystemExit",
    "Exception",
    "ArithmeticError",
    "FloatingPointError",
    "OverflowError",
    "ZeroDivisionError",
    "AssertionError",
    "AttributeError",
    "BufferError",
    "EOFError",
    "ExceptionGroup",
    "ImportError",
    "ModuleNotFoundError",
    "LookupError",
    "IndexError",
    "KeyError",
    "MemoryError",
    "NameError",
    "UnboundLocalError",
    "OSError",
    "BlockingIOError",
    "ChildProcessError",
    "ConnectionError",
    "BrokenPipeError",
    "ConnectionAbortedError",
    "ConnectionRefusedError",
    "ConnectionResetError",
    "FileExistsError",
    "FileNotFoundError",
    "InterruptedError",
    "IsADirectoryError",
    "NotADirectoryError",
    "PermissionError",
    "ProcessLookupError",
    "TimeoutError",
    "EnvironmentError",
    "IOError",
    "ReferenceError",
    "RuntimeError",
    "NotImplementedError",
    "RecursionError",
    "PythonFinalizationError",
    "StopAsyncIteration",
    "StopIteration",
    "SyntaxError",
    "IndentationError",
    "TabError",
    "SystemError",
    "TypeError",
    "ValueError",
    "UnicodeError",
    "UnicodeDecodeError",
    "UnicodeEncodeError",
    "UnicodeTranslateError",
    "Warning",
    "BytesWarning",
    "DeprecationWarning",
    "EncodingWarning",
    "FutureWarning",
    "ImportWarning",
    "PendingDeprecationWarning",
    "ResourceWarning",
    "RuntimeWarning",
    "SyntaxWarning",
    "UnicodeWarning",
    "UserWarning",
];

pub fn is_builtin_exception(kind: &str) -> bool {
    BUILTIN_EXCEPTIONS.contains(&kind)
}

pub struct PytestWriter<W: Write> {
    out: W,
}

impl<W: Write> PytestWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_module(&mut self, module: &GeneratedModule) -> fmt::Result {
        self.write_header(module)?;
        self.write_imports(module)?;
        self.write_class(module)
    }

    fn write_header(&mut self, module: &GeneratedModule) -> fmt::Result {
        writeln!(
            self.out,
            "# Generated by testsynth from {}",
            single_line(&module.unit_name)
        )?;
        writeln!(
            self.out,
            "# Coverage target: {}% line coverage",
            module.coverage_target
        )?;
        writeln!(self.out)?;
        writeln!(self.out, "import pytest")?;
        if module.needs_asyncio() {
            writeln!(self.out, "import asyncio")?;
        }
        Ok(())
    }

    fn write_imports(&mut self, module: &GeneratedModule) -> fmt::Result {
        let names = module.imported_names();
        if names.is_empty() {
            return writeln!(self.out);
        }

        if module.importable_by_name {
            writeln!(self.out)?;
            writeln!(
                self.out,
                "from {} import {}",
                module.import_path,
                names.join(", ")
            )?;
        } else {
            writeln!(self.out, "import importlib")?;
            writeln!(self.out)?;
            writeln!(
                self.out,
                "_module = importlib.import_module({})",
                Literal::Str(module.import_path.clone().into()).to_python()
            )?;
            for name in &names {
                writeln!(self.out, "{} = _module.{}", name, name)?;
            }
        }
        writeln!(self.out)
    }

    fn write_class(&mut self, module: &GeneratedModule) -> fmt::Result {
        writeln!(self.out)?;
        writeln!(self.out, "class {}:", module.test_class)?;
        writeln!(
            self.out,
            "{}\"\"\"Generated tests for {}.\"\"\"",
            INDENT,
            doc_safe(&module.import_path)
        )?;

        if module.tests.is_empty() {
            writeln!(self.out)?;
            return writeln!(self.out, "{}pass", INDENT);
        }

        for test in &module.tests {
            writeln!(self.out)?;
            self.write_test(test)?;
        }
        Ok(())
    }

    fn write_test(&mut self, test: &GeneratedTest) -> fmt::Result {
        let body = INDENT.repeat(2);
        let (kind, topic) = test
            .cases
            .first()
            .map(|c| (c.kind.to_string(), c.topic.replace('_', " ")))
            .unwrap_or_default();

        writeln!(self.out, "{}def {}(self):", INDENT, test.name)?;
        writeln!(
            self.out,
            "{}\"\"\"{}: {} {}.\"\"\"",
            body,
            test.target.qualified_name(),
            kind,
            doc_safe(&topic)
        )?;

        for case in &test.cases {
            self.write_case(&test.target, case, &body)?;
        }
        Ok(())
    }

    fn write_case(&mut self, target: &TestTarget, case: &AssertionCase, indent: &str) -> fmt::Result {
        let note = case
            .note
            .as_deref()
            .map(|n| format!("  # {}", single_line(n)))
            .unwrap_or_default();

        match &case.expected {
            Expected::Value(literal) => writeln!(
                self.out,
                "{}assert {} == {}{}",
                indent,
                call_expression(target, &case.inputs),
                expected_literal(literal),
                note
            ),
            Expected::Raises(kind) => {
                writeln!(self.out, "{}with pytest.raises({}):{}", indent, kind, note)?;
                writeln!(
                    self.out,
                    "{}{}{}",
                    indent,
                    INDENT,
                    call_expression(target, &case.inputs)
                )
            }
            Expected::Callable => writeln!(
                self.out,
                "{}assert callable({}){}",
                indent,
                reference(target),
                note
            ),
            Expected::Instance => {
                writeln!(
                    self.out,
                    "{}instance = {}{}",
                    indent,
                    call_expression(target, &case.inputs),
                    note
                )?;
                writeln!(self.out, "{}assert instance is not None", indent)?;
                if target.kind == SymbolKind::Class {
                    writeln!(
                        self.out,
                        "{}assert isinstance(instance, {})",
                        indent, target.name
                    )?;
                }
                Ok(())
            }
        }
    }
}

/// Name of the target without calling it.
fn reference(target: &TestTarget) -> String {
    target.qualified_name()
}

/// Call of the target with literal arguments.
///
/// Instance methods run on a fresh no-argument instance; async targets are
/// driven to completion with `asyncio.run`.
fn call_expression(target: &TestTarget, inputs: &[Literal]) -> String {
    let args = inputs
        .iter()
        .map(Literal::to_python)
        .collect::<Vec<_>>()
        .join(", ");

    let callee = match (&target.owning_class, target.is_static_like) {
        (Some(class), false) => format!("{}().{}", class, target.name),
        (Some(class), true) => format!("{}.{}", class, target.name),
        (None, _) => target.name.clone(),
    };

    let call = format!("{}({})", callee, args);
    if target.is_async && target.kind != SymbolKind::Class {
        format!("asyncio.run({})", call)
    } else {
        call
    }
}

fn expected_literal(literal: &Literal) -> String {
    if literal.is_float() {
        format!("pytest.approx({})", literal.to_python())
    } else {
        literal.to_python()
    }
}

fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Text safe to place inside a triple-quoted docstring.
fn doc_safe(text: &str) -> String {
    text.chars()
        .map(|c| if c == '"' || c == '\\' || c.is_control() { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CaseKind, Language, Signature};
    use crate::patterns::Category;
    use pretty_assertions::assert_eq;
    use std::borrow::Cow;

    fn target(sig: &Signature) -> TestTarget {
        TestTarget::of(sig)
    }

    #[test]
    fn test_call_expressions() {
        let args = [Literal::Int(2), Literal::Int(3)];
        assert_eq!(call_expression(&target(&Signature::function("add")), &args), "add(2, 3)");
        assert_eq!(
            call_expression(&target(&Signature::method("Calc", "add")), &args),
            "Calc().add(2, 3)"
        );

        let mut stat = Signature::method("Calc", "add");
        stat.decorators.push("staticmethod".into());
        assert_eq!(call_expression(&target(&stat), &args), "Calc.add(2, 3)");

        let mut asynchronous = Signature::function("fetch");
        asynchronous.is_async = true;
        assert_eq!(
            call_expression(&target(&asynchronous), &[]),
            "asyncio.run(fetch())"
        );
    }

    #[test]
    fn test_float_expectations_use_approx() {
        assert_eq!(expected_literal(&Literal::Float(3.5)), "pytest.approx(3.5)");
        assert_eq!(expected_literal(&Literal::Int(15)), "15");
    }

    #[test]
    fn test_builtin_exceptions() {
        assert!(is_builtin_exception("ZeroDivisionError"));
        for kind in [
            "TimeoutError",
            "ConnectionError",
            "KeyboardInterrupt",
            "SystemExit",
            "UnicodeDecodeError",
            "FileExistsError",
            "EOFError",
        ] {
            assert!(is_builtin_exception(kind), "{kind}");
        }
        assert!(!is_builtin_exception("InvalidEmailError"));
        assert!(!is_builtin_exception("DnsTimeoutError"));
    }

    #[test]
    fn test_renders_error_and_value_cases() {
        let module = GeneratedModule {
            unit_name: "calc.py".into(),
            import_path: "calc".into(),
            importable_by_name: true,
            file_name: "test_calc.py".into(),
            test_class: "TestCalc".into(),
            language: Language::Python,
            coverage_target: 85.0,
            tests: vec![
                GeneratedTest {
                    name: "test_divide_positive_integers".into(),
                    target: target(&Signature::function("divide")),
                    category: Category::Generic,
                    cases: vec![AssertionCase {
                        kind: CaseKind::Positive,
                        topic: Cow::Borrowed("integers"),
                        inputs: vec![Literal::Int(7), Literal::Int(2)],
                        expected: Expected::Value(Literal::Float(3.5)),
                        note: None,
                    }],
                },
                GeneratedTest {
                    name: "test_divide_error_division_by_zero".into(),
                    target: target(&Signature::function("divide")),
                    category: Category::Generic,
                    cases: vec![AssertionCase {
                        kind: CaseKind::Error,
                        topic: Cow::Borrowed("division_by_zero"),
                        inputs: vec![Literal::Int(5), Literal::Int(0)],
                        expected: Expected::Raises(Cow::Borrowed("ZeroDivisionError")),
                        note: None,
                    }],
                },
            ],
        };

        let expected = r#"# Generated by testsynth from calc.py
# Coverage target: 85% line coverage

import pytest

from calc import divide


class TestCalc:
    """Generated tests for calc."""

    def test_divide_positive_integers(self):
        """divide: positive integers."""
        assert divide(7, 2) == pytest.approx(3.5)

    def test_divide_error_division_by_zero(self):
        """divide: error division by zero."""
        with pytest.raises(ZeroDivisionError):
            divide(5, 0)
"#;
        assert_eq!(module.render(), expected);
    }

    #[test]
    fn test_empty_module_renders_pass() {
        let module = GeneratedModule {
            unit_name: "empty.py".into(),
            import_path: "empty".into(),
            importable_by_name: true,
            file_name: "test_empty.py".into(),
            test_class: "TestEmpty".into(),
            language: Language::Python,
            coverage_target: 85.0,
            tests: vec![],
        };
        let expected = r#"# Generated by testsynth from empty.py
# Coverage target: 85% line coverage

import pytest


class TestEmpty:
    """Generated tests for empty."""

    pass
"#;
        assert_eq!(module.render(), expected);
    }

    #[test]
    fn test_unimportable_path_uses_importlib() {
        let module = GeneratedModule {
            unit_name: "my-tool.py".into(),
            import_path: "my-tool".into(),
            importable_by_name: false,
            file_name: "test_my-tool.py".into(),
            test_class: "TestMyTool".into(),
            language: Language::Python,
            coverage_target: 85.0,
            tests: vec![GeneratedTest {
                name: "test_run_positive_callable".into(),
                target: target(&Signature::function("run")),
                category: Category::Generic,
                cases: vec![AssertionCase::callable()],
            }],
        };
        let rendered = module.render();
        assert!(rendered.contains("import importlib\n\n_module = importlib.import_module('my-tool')\nrun = _module.run\n"));
        assert!(rendered.contains("        assert callable(run)\n"));
    }
}
