//! Signature extraction from parsed Rust files.
//!
//! Only top-level `pub fn` items are visited; `mod`, `impl`, `trait` and
//! function bodies are not entered. Types are classified into the signature
//! model:
//!
//! | shape                                 | kind     |
//! |---------------------------------------|----------|
//! | `T`, `&T`                             | scalar   |
//! | `[T; N]`, `&[T]`, `Vec<T>`            | array    |
//! | `impl IntoIterator<Item = T>` (args)  | variadic |
//! | `Result<X, E>` (results)              | X..., `error` |
//!
//! where `T` is a bare identifier. Every other shape is recorded as an
//! `Omission` and left out of the signature.

use quote::ToTokens;
use serde::{Deserialize, Serialize};
use syn::ext::IdentExt;
use syn::visit::Visit;
use syn::{
    Attribute, FnArg, GenericArgument, Item, Meta, Pat, PathArguments, ReturnType, Signature,
    Type, TypeImplTrait, TypeParamBound, Visibility,
};

use crate::signature::{FunctionSignature, ListKind, Param};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Arg,
    Ret,
}

/// A parameter or result left out because its type is not classifiable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Omission {
    pub position: Position,
    pub index: usize,
    pub shape: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedFunction {
    pub file: String,
    #[serde(flatten)]
    pub signature: FunctionSignature,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub omitted: Vec<Omission>,
}

/* ---- Visitor ---- */

pub struct FnVisitor<'a> {
    file: &'a str,
    functions: Vec<ScannedFunction>,
}

impl<'a> FnVisitor<'a> {
    pub fn new(file: &'a str) -> Self {
        Self {
            file,
            functions: Vec::new(),
        }
    }

    pub fn into_functions(self) -> Vec<ScannedFunction> {
        self.functions
    }
}

impl<'ast> Visit<'ast> for FnVisitor<'_> {
    // Top-level items only.
    fn visit_item(&mut self, item: &'ast Item) {
        if let Item::Fn(f) = item {
            self.visit_item_fn(f);
        }
    }

    fn visit_item_fn(&mut self, item: &'ast syn::ItemFn) {
        if !is_exported(&item.vis) || is_test_only(&item.attrs) {
            return;
        }
        self.functions.push(extract(self.file, &item.sig));
    }
}

/// Externally visible: plain `pub`, not `pub(crate)` or other restrictions.
fn is_exported(vis: &Visibility) -> bool {
    matches!(vis, Visibility::Public(_))
}

fn is_test_only(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        if attr.path().is_ident("test") {
            return true;
        }
        match &attr.meta {
            Meta::List(list) if list.path.is_ident("cfg") => list.tokens.to_string() == "test",
            _ => false,
        }
    })
}

/* ---- Extraction ---- */

struct Extraction {
    signature: FunctionSignature,
    omitted: Vec<Omission>,
    ret_index: usize,
}

impl Extraction {
    fn omit(&mut self, position: Position, index: usize, shape: String) {
        tracing::debug!(
            function = %self.signature.name,
            ?position,
            index,
            shape = %shape,
            "omitting unclassifiable type"
        );
        self.omitted.push(Omission {
            position,
            index,
            shape,
        });
    }

    fn push_ret(&mut self, param: Option<Param>, ty: &Type) {
        let index = self.ret_index;
        self.ret_index += 1;
        match param {
            Some(p) => self.signature.rets.push(p),
            None => self.omit(Position::Ret, index, shape(ty)),
        }
    }

    fn rets(&mut self, ty: &Type) {
        match ty {
            Type::Paren(p) => self.rets(&p.elem),
            Type::Group(g) => self.rets(&g.elem),
            Type::Tuple(t) => {
                for elem in &t.elems {
                    self.push_ret(classify_value(elem), elem);
                }
            }
            _ => match result_ok_type(ty) {
                Some(ok) => {
                    self.rets(ok);
                    self.signature.rets.extend(Param::scalar("error").ok());
                    self.ret_index += 1;
                }
                None => self.push_ret(classify_value(ty), ty),
            },
        }
    }
}

pub fn extract(file: &str, sig: &Signature) -> ScannedFunction {
    let mut ex = Extraction {
        signature: FunctionSignature::new(sig.ident.unraw().to_string()),
        omitted: Vec::new(),
        ret_index: 0,
    };

    for (index, input) in sig.inputs.iter().enumerate() {
        match input {
            FnArg::Typed(pt) => match classify_arg(&pt.ty) {
                Some(param) => {
                    let param = match param_name(&pt.pat) {
                        Some(name) => param.clone().named(name).unwrap_or(param),
                        None => param,
                    };
                    ex.signature.args.push(param);
                }
                None => ex.omit(Position::Arg, index, shape(&pt.ty)),
            },
            FnArg::Receiver(r) => ex.omit(Position::Arg, index, r.to_token_stream().to_string()),
        }
    }
    if sig.variadic.is_some() {
        ex.omit(Position::Arg, sig.inputs.len(), "...".to_string());
    }

    if let ReturnType::Type(_, ty) = &sig.output {
        ex.rets(ty);
    }

    ScannedFunction {
        file: file.to_string(),
        signature: ex.signature,
        omitted: ex.omitted,
    }
}

fn param_name(pat: &Pat) -> Option<String> {
    match pat {
        Pat::Ident(pi) => Some(pi.ident.unraw().to_string()),
        _ => None,
    }
}

fn shape(ty: &Type) -> String {
    ty.to_token_stream().to_string()
}

/* ---- Classification ---- */

/// Argument position: scalar, array or variadic.
pub fn classify_arg(ty: &Type) -> Option<Param> {
    match ty {
        Type::Paren(p) => classify_arg(&p.elem),
        Type::Group(g) => classify_arg(&g.elem),
        Type::ImplTrait(it) => {
            into_iter_item(it).and_then(|item| Param::new(ListKind::Variadic, item).ok())
        }
        _ => classify_value(ty),
    }
}

/// Scalar or array; the only shapes meaningful as results.
pub fn classify_value(ty: &Type) -> Option<Param> {
    let (list, name) = match ty {
        Type::Paren(p) => return classify_value(&p.elem),
        Type::Group(g) => return classify_value(&g.elem),
        Type::Path(_) => match bare_ident(ty) {
            Some(id) => (ListKind::Scalar, id),
            None => (ListKind::Array, vec_element(ty)?),
        },
        Type::Array(a) => (ListKind::Array, bare_ident(&a.elem)?),
        Type::Reference(r) if r.mutability.is_none() => match &*r.elem {
            Type::Slice(s) => (ListKind::Array, bare_ident(&s.elem)?),
            other => (ListKind::Scalar, bare_ident(other)?),
        },
        _ => return None,
    };
    Param::new(list, name).ok()
}

/// `T` with a single unqualified segment and no generic arguments.
fn bare_ident(ty: &Type) -> Option<String> {
    match ty {
        Type::Paren(p) => bare_ident(&p.elem),
        Type::Group(g) => bare_ident(&g.elem),
        Type::Path(tp) if tp.qself.is_none() && tp.path.leading_colon.is_none() => {
            let mut segments = tp.path.segments.iter();
            match (segments.next(), segments.next()) {
                (Some(seg), None) if matches!(seg.arguments, PathArguments::None) => {
                    Some(seg.ident.unraw().to_string())
                }
                _ => None,
            }
        }
        _ => None,
    }
}

/// Single type argument of a one-segment generic path named `name`.
fn single_type_arg<'t>(ty: &'t Type, name: &str) -> Option<&'t Type> {
    let Type::Path(tp) = ty else { return None };
    if tp.qself.is_some() {
        return None;
    }
    let seg = tp.path.segments.last()?;
    if seg.ident != name {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &seg.arguments else {
        return None;
    };
    args.args.iter().find_map(|a| match a {
        GenericArgument::Type(t) => Some(t),
        _ => None,
    })
}

fn vec_element(ty: &Type) -> Option<String> {
    let Type::Path(tp) = ty else { return None };
    if tp.path.segments.len() != 1 {
        return None;
    }
    bare_ident(single_type_arg(ty, "Vec")?)
}

/// The `T` of `Result<T, E>`; the path may be qualified (`io::Result<T>`).
fn result_ok_type(ty: &Type) -> Option<&Type> {
    single_type_arg(ty, "Result")
}

/// `T` of `impl IntoIterator<Item = T>` (or `Item = &T`).
fn into_iter_item(it: &TypeImplTrait) -> Option<String> {
    it.bounds.iter().find_map(|bound| {
        let TypeParamBound::Trait(tb) = bound else {
            return None;
        };
        let seg = tb.path.segments.last()?;
        if seg.ident != "IntoIterator" {
            return None;
        }
        let PathArguments::AngleBracketed(args) = &seg.arguments else {
            return None;
        };
        args.args.iter().find_map(|a| match a {
            GenericArgument::AssocType(assoc) if assoc.ident == "Item" => match &assoc.ty {
                Type::Reference(r) if r.mutability.is_none() => bare_ident(&r.elem),
                other => bare_ident(other),
            },
            _ => None,
        })
    })
}

/* --------------------------------- Tests ---------------------------------- */
