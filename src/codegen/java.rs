//! Java source rendering using genco

use super::{
    Annotation, Code, Declaration, DeclarationKind, Error, Field, JavaType, Method, MethodParam,
    Result, Snippet,
};
use genco::fmt;
use genco::prelude::*;

/// Render a declaration as a complete Java file
pub(super) fn render_declaration(decl: &Declaration, header: &[String]) -> Result<String> {
    let tokens = declaration_tokens(decl, header);

    let mut w = fmt::FmtWriter::new(String::new());
    let fmt = fmt::Config::from_lang::<java::Java>().with_indentation(fmt::Indentation::Space(4));
    let mut config = java::Config::default();
    if !decl.package.is_empty() {
        config = config.with_package(decl.package.clone());
    }

    tokens
        .format_file(&mut w.as_formatter(&fmt), &config)
        .map_err(|e| Error::Render(format!("{}: {}", decl.qualified_name(), e)))?;
    Ok(w.into_inner())
}

fn declaration_tokens(decl: &Declaration, header: &[String]) -> java::Tokens {
    let mut body = java::Tokens::new();
    for field in &decl.fields {
        body.push();
        body.append(field_tokens(field));
    }
    for (i, method) in decl.methods.iter().enumerate() {
        if i > 0 || !decl.fields.is_empty() {
            body.line();
        }
        body.append(method_tokens(method));
    }

    quote! {
        $(for line in header join ($['\r']) => $(format!("// {}", line)))
        $(doc_tokens(&decl.doc))
        $(for a in &decl.annotations join ($['\r']) => $(annotation_tokens(a)))
        $(declaration_signature(decl)) {
            $body
        }
    }
}

fn declaration_signature(decl: &Declaration) -> java::Tokens {
    let mut t = java::Tokens::new();
    for modifier in &decl.modifiers {
        t.append(modifier.as_str());
        t.space();
    }
    t.append(match decl.kind {
        DeclarationKind::Class => "class",
        DeclarationKind::Interface => "interface",
    });
    t.space();
    t.append(decl.name.clone());

    if let Some(parent) = &decl.extends {
        t.space();
        t.append("extends");
        t.space();
        t.append(type_tokens(parent));
    }
    if !decl.implements.is_empty() {
        t.space();
        t.append(match decl.kind {
            DeclarationKind::Class => "implements",
            DeclarationKind::Interface => "extends",
        });
        t.space();
        append_joined(&mut t, &decl.implements, type_tokens);
    }
    t
}

fn field_tokens(field: &Field) -> java::Tokens {
    let mut t = java::Tokens::new();
    for annotation in &field.annotations {
        t.append(annotation_tokens(annotation));
        t.push();
    }
    for modifier in &field.modifiers {
        t.append(modifier.as_str());
        t.space();
    }
    t.append(type_tokens(&field.ty));
    t.space();
    t.append(field.name.clone());
    if let Some(init) = &field.initializer {
        t.space();
        t.append("=");
        t.space();
        t.append(snippet_tokens(init));
    }
    t.append(";");
    t
}

fn method_tokens(method: &Method) -> java::Tokens {
    let signature = method_signature(method);
    let definition = match &method.body {
        Some(statements) => quote! {
            $signature {
                $(for s in statements join ($['\r']) => $(snippet_tokens(s)))
            }
        },
        None => quote!($signature;),
    };

    quote! {
        $(doc_tokens(&method.doc))
        $(for a in &method.annotations join ($['\r']) => $(annotation_tokens(a)))
        $definition
    }
}

fn method_signature(method: &Method) -> java::Tokens {
    let mut t = java::Tokens::new();
    for modifier in &method.modifiers {
        t.append(modifier.as_str());
        t.space();
    }
    t.append(type_tokens(&method.return_type));
    t.space();
    t.append(method.name.clone());
    t.append("(");
    append_joined(&mut t, &method.params, param_tokens);
    t.append(")");
    t
}

fn param_tokens(param: &MethodParam) -> java::Tokens {
    let mut t = java::Tokens::new();
    for annotation in &param.annotations {
        t.append(annotation_tokens(annotation));
        t.space();
    }
    t.append(type_tokens(&param.ty));
    t.space();
    t.append(param.name.clone());
    t
}

fn annotation_tokens(annotation: &Annotation) -> java::Tokens {
    let mut t = java::Tokens::new();
    t.append("@");
    t.append(type_tokens(&annotation.ty));
    if annotation.args.is_empty() {
        return t;
    }

    t.append("(");
    for (i, (name, value)) in annotation.args.iter().enumerate() {
        if i > 0 {
            t.append(",");
            t.space();
        }
        if let Some(name) = name {
            t.append(name.clone());
            t.space();
            t.append("=");
            t.space();
        }
        t.append(snippet_tokens(value));
    }
    t.append(")");
    t
}

fn type_tokens(ty: &JavaType) -> java::Tokens {
    let mut t = java::Tokens::new();
    match &ty.package {
        Some(package) => t.append(java::import(package.clone(), ty.name.clone())),
        None => t.append(ty.name.clone()),
    }
    if !ty.args.is_empty() {
        t.append("<");
        append_joined(&mut t, &ty.args, type_tokens);
        t.append(">");
    }
    t
}

fn snippet_tokens(snippet: &Snippet) -> java::Tokens {
    let mut t = java::Tokens::new();
    for code in &snippet.0 {
        match code {
            Code::Text(text) => t.append(text.clone()),
            Code::Type(ty) => t.append(type_tokens(ty)),
            Code::Str(s) => t.append(quoted(s.clone())),
        }
    }
    t
}

fn doc_tokens(doc: &[String]) -> java::Tokens {
    let mut t = java::Tokens::new();
    if doc.is_empty() {
        return t;
    }
    t.append("/**");
    for line in doc {
        t.push();
        t.append(format!(" * {}", line));
    }
    t.push();
    t.append(" */");
    t
}

fn append_joined<T>(t: &mut java::Tokens, items: &[T], render: fn(&T) -> java::Tokens) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            t.append(",");
            t.space();
        }
        t.append(render(item));
    }
}
