use derive_more::Display;
use protovet_schema::prelude::*;
use thiserror::Error as ThisError;

///
/// ProjectionError
/// a field whose rules cannot be projected onto its shape
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum ProjectionError {
    #[error("cannot get element context from field `{field}`")]
    NotACollection { field: String },

    #[error("cannot get key context from field `{field}`")]
    NotAMap { field: String },

    #[error("cannot unwrap non-wrapper context of field `{field}` ({tag})")]
    NotAWrapper { field: String, tag: Tag },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("unknown rule type ({kind}) for field `{field}`")]
    Unresolvable { field: String, kind: RuleKind },
}

///
/// Tag
/// the canonical template selector of a context
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Tag {
    #[display("{_0}")]
    Kind(RuleKind),

    #[display("message")]
    Message,

    #[display("none")]
    None,

    #[display("wrapper({_0})")]
    Wrapper(RuleKind),
}

///
/// ContextRules
///

#[derive(Clone, Debug, PartialEq)]
pub enum ContextRules {
    /// Embedded message validation, with optional required/skip rules.
    Message(Option<MessageRules>),

    /// Nothing to render.
    None,

    Typed(TypeRules),

    /// Scalar rules on a nullable wrapper; rendered as a presence check
    /// around the unwrapped scalar rules.
    Wrapper(TypeRules),
}

///
/// RuleContext
/// the render-ready projection of one field, or of a nested key, element or
/// unwrapped position of it
///

#[derive(Clone, Debug)]
pub struct RuleContext<'a> {
    pub field: &'a Field,
    pub shape: Shape<'a>,
    pub rules: ContextRules,
    pub message_rules: Option<MessageRules>,
    pub error_base: Option<ErrorBase>,

    /// Whether this context declares its own errors, or reuses the error
    /// of the enclosing alternative at `err_index`.
    pub define_err: bool,
    pub err_index: Option<usize>,
    pub inherited: Option<ErrorSpec>,

    /// Suffix distinguishing nested constants (`Key`, `Value`).
    pub index: &'static str,
    pub accessor: Option<String>,
}

impl<'a> RuleContext<'a> {
    /// Project a top-level field of `message`.
    pub fn new(message: &Message, field: &'a Field) -> Result<Self, ProjectionError> {
        let error_base = message.error_base()?;
        let rules = field.rules()?.unwrap_or_default();
        let (rules, message_rules) = resolve(field, field.shape(), rules)?;

        Ok(Self {
            field,
            shape: field.shape(),
            rules,
            message_rules,
            error_base,
            define_err: true,
            err_index: None,
            inherited: None,
            index: "",
            accessor: None,
        })
    }

    #[must_use]
    pub fn tag(&self) -> Tag {
        match &self.rules {
            ContextRules::Message(_) => Tag::Message,
            ContextRules::None => Tag::None,
            ContextRules::Typed(rules) => Tag::Kind(rules.kind()),
            ContextRules::Wrapper(rules) => Tag::Wrapper(rules.kind()),
        }
    }

    #[must_use]
    pub const fn is_nested(&self) -> bool {
        self.accessor.is_some()
    }

    // key
    // the context of the keys of a map field
    pub fn key(
        &self,
        name: &str,
        index: &'static str,
        err_index: Option<usize>,
    ) -> Result<Self, ProjectionError> {
        let (ContextRules::Typed(TypeRules::Map(rules)), Some(key)) = (&self.rules, self.shape.key())
        else {
            return Err(ProjectionError::NotAMap {
                field: self.field.name.clone(),
            });
        };
        let declared = rules.keys();
        let inherited = alternative_error(&rules.rules, err_index.or(declared.map(|(i, _)| i)));

        self.child(Shape::Element(key), declared, name, index, err_index, inherited)
    }

    // elem
    // the context of the items of a repeated field or the values of a map
    pub fn elem(
        &self,
        name: &str,
        index: &'static str,
        err_index: Option<usize>,
    ) -> Result<Self, ProjectionError> {
        let not_a_collection = || ProjectionError::NotACollection {
            field: self.field.name.clone(),
        };
        let (declared, inherited) = match &self.rules {
            ContextRules::Typed(TypeRules::Repeated(rules)) => {
                let declared = rules.items();
                let at = err_index.or(declared.map(|(i, _)| i));

                (declared, alternative_error(&rules.rules, at))
            }
            ContextRules::Typed(TypeRules::Map(rules)) => {
                let declared = rules.values();
                let at = err_index.or(declared.map(|(i, _)| i));

                (declared, alternative_error(&rules.rules, at))
            }
            _ => return Err(not_a_collection()),
        };
        let element = self.shape.element().ok_or_else(not_a_collection)?;

        self.child(Shape::Element(element), declared, name, index, err_index, inherited)
    }

    // unwrap
    // the scalar inside a wrapper, read through `name` once presence has
    // been checked; error ownership is kept from the wrapper
    pub fn unwrap(&self, name: &str) -> Result<Self, ProjectionError> {
        let ContextRules::Wrapper(rules) = &self.rules else {
            return Err(ProjectionError::NotAWrapper {
                field: self.field.name.clone(),
                tag: self.tag(),
            });
        };

        Ok(Self {
            rules: ContextRules::Typed(rules.clone()),
            accessor: Some(name.to_string()),
            ..self.clone()
        })
    }

    // error
    // the error a check raises: contexts that declare errors prefer the
    // rule's own, nested ones the enclosing alternative's
    #[must_use]
    pub fn error<'r>(&'r self, own: Option<&'r ErrorSpec>) -> Option<&'r ErrorSpec> {
        if self.define_err {
            own.or(self.inherited.as_ref())
        } else {
            self.inherited.as_ref().or(own)
        }
    }

    fn child(
        &self,
        shape: Shape<'a>,
        declared: Option<(usize, &FieldRules)>,
        name: &str,
        index: &'static str,
        err_index: Option<usize>,
        inherited: Option<ErrorSpec>,
    ) -> Result<Self, ProjectionError> {
        let rules = declared.map(|(_, r)| r.clone()).unwrap_or_default();
        let (rules, message_rules) = resolve(self.field, shape, rules)?;

        Ok(Self {
            field: self.field,
            shape,
            rules,
            message_rules,
            error_base: self.error_base.clone(),
            define_err: false,
            err_index,
            inherited: inherited.or_else(|| self.inherited.clone()),
            index,
            accessor: Some(name.to_string()),
        })
    }
}

fn alternative_error<R: Rule>(rules: &[R], at: Option<usize>) -> Option<ErrorSpec> {
    at.and_then(|i| rules.get(i))
        .and_then(Rule::error)
        .cloned()
}

// resolve
// pick the canonical rules for a shape, applying wrapper unwrapping and the
// defaults implied by the shape when nothing is declared
fn resolve(
    field: &Field,
    shape: Shape<'_>,
    rules: FieldRules,
) -> Result<(ContextRules, Option<MessageRules>), ProjectionError> {
    let FieldRules { message, kind } = rules;

    let Some(kind) = kind else {
        let rules = if shape.is_repeated() {
            ContextRules::Typed(TypeRules::Repeated(RepeatedRules::default()))
        } else if shape.element().is_some_and(ElementType::is_embed) {
            ContextRules::Typed(TypeRules::Map(MapRules::default()))
        } else if shape.is_embed() {
            ContextRules::Message(message.clone())
        } else {
            ContextRules::None
        };

        return Ok((rules, message));
    };

    let rule_kind = kind.kind();
    let rules = if rule_kind.wrapper().is_some() && shape.well_known() == rule_kind.wrapper() {
        ContextRules::Wrapper(kind)
    } else if accepts(shape, rule_kind) {
        ContextRules::Typed(kind)
    } else {
        return Err(ProjectionError::Unresolvable {
            field: field.name.clone(),
            kind: rule_kind,
        });
    };

    Ok((rules, message))
}

fn accepts(shape: Shape<'_>, kind: RuleKind) -> bool {
    match kind {
        RuleKind::Repeated => shape.is_repeated(),
        RuleKind::Map => shape.is_map(),
        RuleKind::Any => shape.well_known() == Some(WellKnownType::Any),
        RuleKind::Duration => shape.well_known() == Some(WellKnownType::Duration),
        RuleKind::Timestamp => shape.well_known() == Some(WellKnownType::Timestamp),
        _ => shape.single().map(ElementType::proto_type) == kind.proto_type(),
    }
}

///
/// TESTS
///
