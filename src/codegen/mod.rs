//! Code model - the sink generation rules write declarations into
//!
//! A [`CodeModel`] accumulates structured Java declarations (classes and
//! interfaces with their annotations, fields and methods). It does not
//! interpret them; serialization to source text is delegated to the
//! genco-based renderer in [`java`].
//!
//! Method bodies and annotation arguments are [`Snippet`]s: sequences of raw
//! text, type references and string literals, so that every referenced type
//! ends up in the import list of the rendered file.

mod java;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Reference to a Java type, optionally parameterized
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JavaType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<JavaType>,
}

impl JavaType {
    /// Type in the given package; an empty package means no import
    pub fn new(package: &str, name: &str) -> Self {
        Self {
            package: (!package.is_empty()).then(|| package.to_string()),
            name: name.to_string(),
            args: Vec::new(),
        }
    }

    /// Type from `java.lang`
    pub fn lang(name: &str) -> Self {
        Self::new("java.lang", name)
    }

    /// Primitive, keyword or type variable that never needs an import
    pub fn local(name: &str) -> Self {
        Self::new("", name)
    }

    pub fn void() -> Self {
        Self::local("void")
    }

    pub fn wildcard() -> Self {
        Self::local("?")
    }

    pub fn with_arg(mut self, arg: JavaType) -> Self {
        self.args.push(arg);
        self
    }

    pub fn qualified_name(&self) -> String {
        match &self.package {
            Some(package) => format!("{}.{}", package, self.name),
            None => self.name.clone(),
        }
    }

    pub fn is_void(&self) -> bool {
        self.package.is_none() && self.name == "void"
    }
}

impl std::fmt::Display for JavaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            let args: Vec<_> = self.args.iter().map(|a| a.to_string()).collect();
            write!(f, "<{}>", args.join(", "))?;
        }
        Ok(())
    }
}

/// One piece of a code snippet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Code {
    /// Verbatim source text
    Text(String),
    /// Type reference, imported on render
    Type(JavaType),
    /// String literal, quoted and escaped on render
    Str(String),
}

/// A fragment of Java source built from [`Code`] pieces
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snippet(pub Vec<Code>);

impl Snippet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.0.push(Code::Text(text.into()));
        self
    }

    pub fn ty(mut self, ty: JavaType) -> Self {
        self.0.push(Code::Type(ty));
        self
    }

    pub fn string(mut self, literal: impl Into<String>) -> Self {
        self.0.push(Code::Str(literal.into()));
        self
    }

    pub fn append(mut self, other: Snippet) -> Self {
        self.0.extend(other.0);
        self
    }

    /// Literal string snippet, e.g. an annotation value
    pub fn quoted(literal: impl Into<String>) -> Self {
        Self::new().string(literal)
    }

    /// Plain text rendering, types by simple name
    pub fn to_plain_string(&self) -> String {
        self.0
            .iter()
            .map(|c| match c {
                Code::Text(t) => t.clone(),
                Code::Type(t) => t.to_string(),
                Code::Str(s) => format!("{:?}", s),
            })
            .collect()
    }
}

impl From<&str> for Snippet {
    fn from(text: &str) -> Self {
        Snippet::new().text(text)
    }
}

impl From<String> for Snippet {
    fn from(text: String) -> Self {
        Snippet::new().text(text)
    }
}

/// Java annotation with optional arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub ty: JavaType,
    /// `(None, value)` renders as the single unnamed `value` argument
    pub args: Vec<(Option<String>, Snippet)>,
}

impl Annotation {
    pub fn new(ty: JavaType) -> Self {
        Self {
            ty,
            args: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: Snippet) -> Self {
        self.args.push((None, value));
        self
    }

    pub fn with_arg(mut self, name: &str, value: Snippet) -> Self {
        self.args.push((Some(name.to_string()), value));
        self
    }

    /// Named argument lookup, unnamed argument under `value`
    pub fn arg(&self, name: &str) -> Option<&Snippet> {
        self.args
            .iter()
            .find(|(n, _)| n.as_deref().unwrap_or("value") == name)
            .map(|(_, v)| v)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
}

impl Modifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Abstract => "abstract",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub annotations: Vec<Annotation>,
    pub modifiers: Vec<Modifier>,
    pub ty: JavaType,
    pub name: String,
    pub initializer: Option<Snippet>,
}

impl Field {
    /// Private field without initializer
    pub fn private(ty: JavaType, name: impl Into<String>) -> Self {
        Self {
            annotations: Vec::new(),
            modifiers: vec![Modifier::Private],
            ty,
            name: name.into(),
            initializer: None,
        }
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodParam {
    pub annotations: Vec<Annotation>,
    pub ty: JavaType,
    pub name: String,
}

impl MethodParam {
    pub fn new(ty: JavaType, name: impl Into<String>) -> Self {
        Self {
            annotations: Vec::new(),
            ty,
            name: name.into(),
        }
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub doc: Vec<String>,
    pub annotations: Vec<Annotation>,
    pub modifiers: Vec<Modifier>,
    pub return_type: JavaType,
    pub name: String,
    pub params: Vec<MethodParam>,
    /// `None` renders an abstract/interface method
    pub body: Option<Vec<Snippet>>,
}

impl Method {
    pub fn new(return_type: JavaType, name: impl Into<String>) -> Self {
        Self {
            doc: Vec::new(),
            annotations: Vec::new(),
            modifiers: Vec::new(),
            return_type,
            name: name.into(),
            params: Vec::new(),
            body: None,
        }
    }

    pub fn public(mut self) -> Self {
        self.modifiers.push(Modifier::Public);
        self
    }

    pub fn with_doc(mut self, line: impl Into<String>) -> Self {
        self.doc.push(line.into());
        self
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_param(mut self, param: MethodParam) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_body(mut self, statements: Vec<Snippet>) -> Self {
        self.body = Some(statements);
        self
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.ty.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclarationKind {
    Class,
    Interface,
}

/// A top-level class or interface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    pub package: String,
    pub name: String,
    pub kind: DeclarationKind,
    pub doc: Vec<String>,
    pub annotations: Vec<Annotation>,
    pub modifiers: Vec<Modifier>,
    pub extends: Option<JavaType>,
    pub implements: Vec<JavaType>,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
}

impl Declaration {
    fn new(package: &str, name: &str, kind: DeclarationKind) -> Self {
        Self {
            package: package.to_string(),
            name: name.to_string(),
            kind,
            doc: Vec::new(),
            annotations: Vec::new(),
            modifiers: vec![Modifier::Public],
            extends: None,
            implements: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn qualified_name(&self) -> String {
        self.as_type().qualified_name()
    }

    /// Type reference to this declaration
    pub fn as_type(&self) -> JavaType {
        JavaType::new(&self.package, &self.name)
    }

    pub fn annotate(&mut self, annotation: Annotation) -> &mut Self {
        self.annotations.push(annotation);
        self
    }

    pub fn add_doc(&mut self, line: impl Into<String>) -> &mut Self {
        self.doc.push(line.into());
        self
    }

    pub fn add_field(&mut self, field: Field) -> &mut Self {
        self.fields.push(field);
        self
    }

    pub fn add_method(&mut self, method: Method) -> &mut Self {
        self.methods.push(method);
        self
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.ty.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Accumulates generated declarations and serializes them on demand
#[derive(Debug, Clone, Default)]
pub struct CodeModel {
    header: Vec<String>,
    declarations: Vec<Declaration>,
}

impl CodeModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Comment lines emitted at the top of every rendered declaration
    pub fn with_header(mut self, header: Vec<String>) -> Self {
        self.header = header;
        self
    }

    /// Create a new declaration; fully qualified names must be unique
    pub fn declare(
        &mut self,
        package: &str,
        name: &str,
        kind: DeclarationKind,
    ) -> Result<&mut Declaration> {
        let decl = Declaration::new(package, name, kind);
        if self.get(&decl.qualified_name()).is_some() {
            return Err(Error::DuplicateDeclaration(decl.qualified_name()));
        }
        self.declarations.push(decl);
        let last = self.declarations.len() - 1;
        Ok(&mut self.declarations[last])
    }

    pub fn get(&self, qualified_name: &str) -> Option<&Declaration> {
        self.declarations
            .iter()
            .find(|d| d.qualified_name() == qualified_name)
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Render one declaration to Java source
    pub fn render(&self, decl: &Declaration) -> Result<String> {
        java::render_declaration(decl, &self.header)
    }

    /// Write every declaration below `dir` as `<package path>/<Name>.java`
    pub fn build(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for decl in &self.declarations {
            let mut path = dir.to_path_buf();
            for part in decl.package.split('.').filter(|p| !p.is_empty()) {
                path.push(part);
            }
            std::fs::create_dir_all(&path).map_err(Error::Io)?;
            path.push(format!("{}.java", decl.name));
            std::fs::write(&path, self.render(decl)?).map_err(Error::Io)?;
            written.push(path);
        }
        Ok(written)
    }

    /// Serialize every declaration into one stream, each preceded by a
    /// separator line naming its file
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        for decl in &self.declarations {
            let file = format!("{}.java", decl.qualified_name().replace('.', "/"));
            writeln!(
                out,
                "-----------------------------------{}-----------------------------------",
                file
            )?;
            writeln!(out)?;
            out.write_all(self.render(decl)?.as_bytes())?;
            writeln!(out)?;
        }
        Ok(())
    }

    /// Single-stream serialization into a string
    pub fn to_source_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        String::from_utf8(buf).map_err(|e| Error::Render(e.to_string()))
    }
}
