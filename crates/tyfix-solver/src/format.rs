//! Type formatting for diagnostic messages.

use crate::decl::DeclStore;
use crate::intern::TypeInterner;
use crate::types::{KeyPathKind, PointerKind, TypeData, TypeId};
use std::fmt::Write;

/// Renders types in source-like syntax, e.g. `[Int]`, `S?`,
/// `(Int) throws -> String`, `$T0`.
pub struct TypeFormatter<'a> {
    types: &'a TypeInterner,
    decls: &'a DeclStore,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(types: &'a TypeInterner, decls: &'a DeclStore) -> Self {
        TypeFormatter { types, decls }
    }

    pub fn format(&self, ty: TypeId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, ty);
        out
    }

    fn write_type(&self, out: &mut String, ty: TypeId) {
        let Some(data) = self.types.lookup(ty) else {
            out.push_str("<<invalid type>>");
            return;
        };
        match data {
            TypeData::Intrinsic(kind) => out.push_str(kind.name()),
            TypeData::Nominal(decl) | TypeData::Existential(decl) => {
                out.push_str(&self.types.resolve_atom(self.decls.name(decl)));
            }
            TypeData::BoundGeneric { decl, args } => {
                out.push_str(&self.types.resolve_atom(self.decls.name(decl)));
                out.push('<');
                self.write_list(out, &self.types.type_list(args));
                out.push('>');
            }
            TypeData::Optional(inner) => {
                let needs_parens = matches!(
                    self.types.lookup(inner),
                    Some(TypeData::Function(_))
                );
                if needs_parens {
                    out.push('(');
                }
                self.write_type(out, inner);
                if needs_parens {
                    out.push(')');
                }
                out.push('?');
            }
            TypeData::Array(element) => {
                out.push('[');
                self.write_type(out, element);
                out.push(']');
            }
            TypeData::Dictionary { key, value } => {
                out.push('[');
                self.write_type(out, key);
                out.push_str(" : ");
                self.write_type(out, value);
                out.push(']');
            }
            TypeData::Tuple(list) => {
                out.push('(');
                for (i, element) in self.types.tuple_list(list).iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    if !element.label.is_none() {
                        out.push_str(&self.types.resolve_atom(element.label));
                        out.push_str(": ");
                    }
                    self.write_type(out, element.ty);
                }
                out.push(')');
            }
            TypeData::Function(shape) => {
                let Some(shape) = self.types.function_shape(shape) else {
                    out.push_str("<<invalid function>>");
                    return;
                };
                if shape.escaping {
                    out.push_str("@escaping ");
                }
                out.push('(');
                for (i, param) in shape.params.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    if param.is_autoclosure() {
                        out.push_str("@autoclosure ");
                    }
                    if param.is_inout() {
                        out.push_str("inout ");
                    }
                    self.write_type(out, param.ty);
                    if param.is_variadic() {
                        out.push_str("...");
                    }
                }
                out.push(')');
                if shape.throws {
                    out.push_str(" throws");
                }
                out.push_str(" -> ");
                self.write_type(out, shape.result);
            }
            TypeData::Metatype(instance) => {
                self.write_type(out, instance);
                if self.types.is_existential(instance) {
                    out.push_str(".Protocol");
                } else {
                    out.push_str(".Type");
                }
            }
            TypeData::LValue(object) => {
                out.push_str("@lvalue ");
                self.write_type(out, object);
            }
            TypeData::InOut(object) => {
                out.push_str("inout ");
                self.write_type(out, object);
            }
            TypeData::TypeVariable(var) => {
                let _ = write!(out, "$T{}", var.0);
            }
            TypeData::GenericParam { name, .. } => {
                out.push_str(&self.types.resolve_atom(name));
            }
            TypeData::KeyPath { kind, root, value } => {
                out.push_str(match kind {
                    KeyPathKind::ReadOnly => "KeyPath<",
                    KeyPathKind::Writable => "WritableKeyPath<",
                    KeyPathKind::ReferenceWritable => "ReferenceWritableKeyPath<",
                });
                self.write_list(out, &[root, value]);
                out.push('>');
            }
            TypeData::Pointer { kind, pointee } => match kind {
                PointerKind::Raw => out.push_str("UnsafeRawPointer"),
                PointerKind::Immutable | PointerKind::Mutable => {
                    out.push_str(if kind == PointerKind::Mutable {
                        "UnsafeMutablePointer<"
                    } else {
                        "UnsafePointer<"
                    });
                    self.write_type(out, pointee);
                    out.push('>');
                }
            },
        }
    }

    fn write_list(&self, out: &mut String, types: &[TypeId]) {
        for (i, &ty) in types.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_type(out, ty);
        }
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod format_tests;
