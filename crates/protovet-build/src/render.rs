use crate::context::{ContextRules, ProjectionError, RuleContext};
use protovet_schema::prelude::*;
use thiserror::Error as ThisError;

///
/// RenderError
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum RenderError {
    #[error("invalid Rust path `{0}`")]
    InvalidPath(String),

    #[error("field `{field}` has a check without an error to raise")]
    MissingError { field: String },

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Temporal(#[from] TemporalError),
}

///
/// FieldTemplates
/// one rendering function per template tag; numeric kinds share a single
/// template over width-erased values
///

pub trait FieldTemplates: Sized {
    type Output: Default;

    fn numeric(
        &self,
        r: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        kind: RuleKind,
        rules: &NumericRules<Number>,
    ) -> Result<Self::Output, RenderError>;

    fn boolean(
        &self,
        r: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &BoolRules,
    ) -> Result<Self::Output, RenderError>;

    fn string(
        &self,
        r: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &StringRules,
    ) -> Result<Self::Output, RenderError>;

    fn bytes(
        &self,
        r: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &BytesRules,
    ) -> Result<Self::Output, RenderError>;

    fn enumeration(
        &self,
        r: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &EnumRules,
    ) -> Result<Self::Output, RenderError>;

    fn repeated(
        &self,
        r: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &RepeatedRules,
    ) -> Result<Self::Output, RenderError>;

    fn map(
        &self,
        r: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &MapRules,
    ) -> Result<Self::Output, RenderError>;

    fn any(
        &self,
        r: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &AnyRules,
    ) -> Result<Self::Output, RenderError>;

    fn duration(
        &self,
        r: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &DurationRules,
    ) -> Result<Self::Output, RenderError>;

    fn timestamp(
        &self,
        r: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: &TimestampRules,
    ) -> Result<Self::Output, RenderError>;

    fn message(
        &self,
        r: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        rules: Option<&MessageRules>,
    ) -> Result<Self::Output, RenderError>;

    /// Presence check around the unwrapped scalar rules, which are rendered
    /// through [`RuleContext::unwrap`].
    fn wrapper(
        &self,
        r: &Renderer<'_, Self>,
        ctx: &RuleContext<'_>,
        kind: RuleKind,
    ) -> Result<Self::Output, RenderError>;
}

///
/// Renderer
/// selects the template for a context and renders it; templates call back
/// into the renderer for nested contexts
///

pub struct Renderer<'a, T> {
    pub schema: &'a Schema,
    pub templates: &'a T,
}

impl<'a, T: FieldTemplates> Renderer<'a, T> {
    #[must_use]
    pub const fn new(schema: &'a Schema, templates: &'a T) -> Self {
        Self { schema, templates }
    }

    pub fn render(&self, ctx: &RuleContext<'_>) -> Result<T::Output, RenderError> {
        match &ctx.rules {
            ContextRules::None => Ok(T::Output::default()),
            ContextRules::Message(rules) => self.templates.message(self, ctx, rules.as_ref()),
            ContextRules::Typed(rules) => self.typed(ctx, rules),
            ContextRules::Wrapper(rules) => self.templates.wrapper(self, ctx, rules.kind()),
        }
    }

    fn typed(&self, ctx: &RuleContext<'_>, rules: &TypeRules) -> Result<T::Output, RenderError> {
        let t = self.templates;
        let kind = rules.kind();

        match rules {
            TypeRules::Any(r) => t.any(self, ctx, r),
            TypeRules::Bool(r) => t.boolean(self, ctx, r),
            TypeRules::Bytes(r) => t.bytes(self, ctx, r),
            TypeRules::Double(r) => t.numeric(self, ctx, kind, &r.erase()),
            TypeRules::Duration(r) => t.duration(self, ctx, r),
            TypeRules::Enum(r) => t.enumeration(self, ctx, r),
            TypeRules::Fixed32(r) => t.numeric(self, ctx, kind, &r.erase()),
            TypeRules::Fixed64(r) => t.numeric(self, ctx, kind, &r.erase()),
            TypeRules::Float(r) => t.numeric(self, ctx, kind, &r.erase()),
            TypeRules::Int32(r) => t.numeric(self, ctx, kind, &r.erase()),
            TypeRules::Int64(r) => t.numeric(self, ctx, kind, &r.erase()),
            TypeRules::Map(r) => t.map(self, ctx, r),
            TypeRules::Repeated(r) => t.repeated(self, ctx, r),
            TypeRules::SFixed32(r) => t.numeric(self, ctx, kind, &r.erase()),
            TypeRules::SFixed64(r) => t.numeric(self, ctx, kind, &r.erase()),
            TypeRules::SInt32(r) => t.numeric(self, ctx, kind, &r.erase()),
            TypeRules::SInt64(r) => t.numeric(self, ctx, kind, &r.erase()),
            TypeRules::String(r) => t.string(self, ctx, r),
            TypeRules::Timestamp(r) => t.timestamp(self, ctx, r),
            TypeRules::UInt32(r) => t.numeric(self, ctx, kind, &r.erase()),
            TypeRules::UInt64(r) => t.numeric(self, ctx, kind, &r.erase()),
        }
    }
}

///
/// TESTS
///
