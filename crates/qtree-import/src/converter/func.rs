//! Function calls

use super::{Attempt, Converter, ValueTarget};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::index::FuncSignature;
use indexmap::IndexMap;
use qtree_core::logic::Logic;
use qtree_core::types::FuncValue;
use qtree_core::{FuncConfig, Operand};
use serde_json::Value;

impl<'a> Converter<'a> {
    /// `{"name": [args...]}` or `{"method": [obj, "name", ...opts]}` as a function operand
    pub(crate) fn convert_func(
        &self,
        expr: &Value,
        logic: Logic<'_>,
        target: &ValueTarget<'_>,
        parent: Option<&str>,
        diags: &mut Diagnostics,
    ) -> Attempt<Operand> {
        let Logic::Operation { op, args } = logic else {
            return Attempt::NoMatch;
        };

        let (signature, supplied): (FuncSignature, Vec<&Value>) = if op == "method" {
            match args {
                [obj, Value::String(name), opts @ ..] => (
                    FuncSignature::new(name, true),
                    std::iter::once(obj).chain(opts).collect(),
                ),
                _ => return Attempt::NoMatch,
            }
        } else {
            (FuncSignature::new(op, false), args.iter().collect())
        };

        if let Some((key, func)) = self.declared_func(&signature, target) {
            return self.convert_func_args(key, func, &supplied, parent, diags);
        }

        match self.import_with_hooks(expr, target) {
            Some((key, func, parsed)) => {
                log::trace!("Function {} matched {} through its importer", key, expr);
                let parsed: Vec<&Value> = parsed.iter().collect();
                self.convert_func_args(key, func, &parsed, parent, diags)
            }
            None => Attempt::NoMatch,
        }
    }

    /// First configured candidate returning the target type
    fn declared_func(
        &self,
        signature: &FuncSignature,
        target: &ValueTarget<'_>,
    ) -> Option<(&'a str, &'a FuncConfig)> {
        let config = self.config;
        self.index.funcs(signature).iter().find_map(|key| {
            config
                .funcs
                .get_key_value(key)
                .filter(|(_, func)| func.return_type == target.value_type)
                .map(|(key, func)| (key.as_str(), func))
        })
    }

    /// First function whose importer hook recognizes the expression
    fn import_with_hooks(
        &self,
        expr: &Value,
        target: &ValueTarget<'_>,
    ) -> Option<(&'a str, &'a FuncConfig, Vec<Value>)> {
        let config = self.config;
        config.funcs.iter().find_map(|(key, func)| {
            let hook = func.importer.as_ref()?;
            if func.return_type != target.value_type {
                return None;
            }
            hook.try_import(expr).map(|args| (key.as_str(), func, args))
        })
    }

    /// Convert supplied arguments against the declared ones
    ///
    /// Missing or unconvertible arguments take their default value; without
    /// one the whole call fails.
    fn convert_func_args(
        &self,
        func_key: &str,
        func: &FuncConfig,
        supplied: &[&Value],
        parent: Option<&str>,
        diags: &mut Diagnostics,
    ) -> Attempt<Operand> {
        if supplied.len() > func.args.len() {
            diags.record(
                DiagnosticKind::UnrecognizedExpression,
                format!("Too many args for func {}", func_key),
            );
            return Attempt::Failed;
        }

        let mut args = IndexMap::with_capacity(func.args.len());
        for (i, (arg_key, arg)) in func.args.iter().enumerate() {
            let converted = supplied
                .get(i)
                .and_then(|value| self.convert_value(value, &ValueTarget::arg(arg), parent, diags));
            let operand = match (converted, &arg.default_value) {
                (Some(operand), _) => operand,
                (None, Some(default)) => Operand::literal(default.clone(), arg.value_type.clone()),
                (None, None) => {
                    diags.record(
                        DiagnosticKind::MissingArgument,
                        format!("No value for arg {} of func {}", arg_key, func_key),
                    );
                    return Attempt::Failed;
                }
            };
            args.insert(arg_key.clone(), operand);
        }

        Attempt::Matched(Operand::func(
            FuncValue {
                func: func_key.to_string(),
                args,
            },
            func.return_type.clone(),
        ))
    }
}
