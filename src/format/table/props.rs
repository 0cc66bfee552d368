//! Table properties: name, vertical spacing and horizontal layout applied
//! as one composite style.

use super::layout::{Percent, Placement, TableAlignKind};
use super::names::{TablePropertyNames, TEXT_TABLE};
use super::size::TableSize;
use crate::common::error::{Error, Result};
use crate::common::unit::LengthValue;
use crate::format::config::{ApplyOptions, FormatContext};
use crate::format::events::EventBus;
use crate::format::frozen::Frozen;
use crate::format::multi::CompositeStyle;
use crate::format::style::{PropertyStyle, Style, StyleReport};
use crate::format::target::PropertyTarget;
use once_cell::sync::Lazy;
use std::any::Any;
use std::sync::Arc;

const SIZE_KEY: &str = "size";
const SPACING_KEY: &str = "spacing";

static DEFAULT_AUTO: Lazy<Frozen<TableProperties>> =
    Lazy::new(|| Frozen::new(TableProperties::from_placement(None, Placement::Auto)));

/// Table name, spacing and layout.
///
/// # Examples
///
/// ```
/// use docstyle::common::unit::LengthValue;
/// use docstyle::format::table::{TableAlignKind, TableProperties};
/// use docstyle::format::{PropertyBag, PropertyValue, Style};
///
/// let mut props = TableProperties::builder()
///     .with_align(TableAlignKind::Center)
///     .with_width(LengthValue::mm(30.0))
///     .build()
///     .unwrap();
///
/// let mut target = PropertyBag::open()
///     .with_capability("com.sun.star.text.TextTable")
///     .with_property("PageTextWidth", 10_000);
/// props.apply(&mut target);
/// assert_eq!(target.get("LeftMargin"), Some(&PropertyValue::Int(3_500)));
/// ```
#[derive(Debug, Clone)]
pub struct TableProperties {
    inner: CompositeStyle,
}

impl TableProperties {
    pub fn builder() -> TablePropertiesBuilder {
        TablePropertiesBuilder::default()
    }

    /// Full-width layout, no name and no spacing.
    pub fn default_auto() -> &'static Frozen<TableProperties> {
        &DEFAULT_AUTO
    }

    pub fn from_placement(name: Option<&str>, placement: Placement) -> Self {
        Self::assemble(name, placement, (None, None), None, TablePropertyNames::default())
    }

    fn assemble(
        name: Option<&str>,
        placement: Placement,
        (top, bottom): (Option<i32>, Option<i32>),
        context: Option<&FormatContext>,
        names: TablePropertyNames,
    ) -> Self {
        let (own, size, mut gap) = match context {
            Some(ctx) => (
                PropertyStyle::with_context("TableProperties", ctx),
                TableSize::with_context(placement, ctx),
                PropertyStyle::with_context("TableSpacing", ctx),
            ),
            None => (
                PropertyStyle::new("TableProperties"),
                TableSize::new(placement),
                PropertyStyle::new("TableSpacing"),
            ),
        };
        let mut inner = CompositeStyle::from_style(own.with_capabilities([TEXT_TABLE]));
        if let Some(name) = name {
            inner.set(names.name.as_str(), name);
        }
        if let Some(top) = top {
            gap.set(names.top_margin.as_str(), top);
        }
        if let Some(bottom) = bottom {
            gap.set(names.bottom_margin.as_str(), bottom);
        }
        let gap = gap.with_capabilities([TEXT_TABLE]);
        inner.set_style(SIZE_KEY, Box::new(size.with_names(names)), &[], None);
        inner.set_style(SPACING_KEY, Box::new(gap), &[], None);
        Self { inner }
    }

    /// Read the table properties a target currently has.
    pub fn from_target(target: &dyn PropertyTarget) -> Result<Self> {
        Self::from_target_with_names(target, &TablePropertyNames::default())
    }

    pub fn from_target_with_names(target: &dyn PropertyTarget, names: &TablePropertyNames) -> Result<Self> {
        if !target.supports_capability(&[TEXT_TABLE]) {
            return Err(Error::CapabilityMismatch {
                style: "TableProperties".to_string(),
                required: vec![TEXT_TABLE.to_string()],
            });
        }
        let int = |name: &str| -> Result<i32> {
            let value = target.get_property(name)?;
            value.as_i32().ok_or_else(|| {
                Error::InvalidArgument(format!("property '{}' is not an integer: {}", name, value))
            })
        };
        let optional = |name: &str| target.get_property(name).ok().and_then(|v| v.as_i32());

        let width = int(&names.width)?;
        let left = int(&names.left_margin)?;
        let right = int(&names.right_margin)?;
        let orient = TableAlignKind::from_value(int(&names.hori_orient)?);
        let relative = target
            .get_property(&names.is_width_relative)
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        let placement = match (relative, orient) {
            (true, Some(kind)) if kind != TableAlignKind::Auto && kind != TableAlignKind::Manual => {
                let page = int(&names.page_text_width)?;
                if page <= 0 {
                    return Err(Error::InvalidArgument(format!(
                        "page width must be positive, got {}",
                        page
                    )));
                }
                let percent_of_page =
                    |length: i32| (length as f64 / page as f64 * 100.0).round().clamp(0.0, 100.0) as u8;
                let rel_width = match optional(&names.relative_width) {
                    Some(pct) if (1..=100).contains(&pct) => Percent::new(pct as u8)?,
                    _ => Percent::new(
                        100u8.saturating_sub(percent_of_page(left) + percent_of_page(right)),
                    )?,
                };
                match kind {
                    TableAlignKind::Left => Placement::RelLeftByWidth(rel_width),
                    TableAlignKind::Right => Placement::RelRightByWidth(rel_width),
                    TableAlignKind::Center => Placement::RelCenter(rel_width),
                    _ => Placement::RelFromLeft {
                        width: rel_width,
                        left: Percent::new(percent_of_page(left))?,
                    },
                }
            },
            (_, Some(TableAlignKind::Auto)) => Placement::Auto,
            (_, Some(TableAlignKind::Center)) => Placement::CenterWidth(width),
            (_, Some(TableAlignKind::Left)) => Placement::LeftMargin(right),
            (_, Some(TableAlignKind::Right)) => Placement::RightMargin(left),
            (_, Some(TableAlignKind::FromLeft)) => Placement::FromLeft(left),
            _ => Placement::Manual {
                left,
                right,
                width: Some(width),
            },
        };

        let name = target
            .get_property(&names.name)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string));
        let spacing = (optional(&names.top_margin), optional(&names.bottom_margin));
        Ok(Self::assemble(
            name.as_deref(),
            placement,
            spacing,
            None,
            names.clone(),
        ))
    }

    #[inline]
    pub fn style(&self) -> &CompositeStyle {
        &self.inner
    }

    pub fn size(&self) -> Option<&TableSize> {
        self.inner.style_as::<TableSize>(SIZE_KEY)
    }

    pub fn size_mut(&mut self) -> Option<&mut TableSize> {
        self.inner.style_as_mut::<TableSize>(SIZE_KEY)
    }

    pub fn spacing(&self) -> Option<&PropertyStyle> {
        self.inner.style_as::<PropertyStyle>(SPACING_KEY)
    }

    pub fn placement(&self) -> Option<Placement> {
        self.size().map(|size| *size.placement())
    }

    pub fn name(&self) -> Option<&str> {
        let size = self.size()?;
        self.inner.base().get(&size.names().name)?.as_str()
    }

    /// Table width, once known.
    pub fn width_mm(&self) -> Option<LengthValue> {
        self.length(|names| &names.width, |p| match p {
            Placement::CenterWidth(w)
            | Placement::LeftWidth(w)
            | Placement::RightWidth(w)
            | Placement::FromLeftWidth(w)
            | Placement::ManualWidth(w) => Some(w),
            Placement::Manual { width, .. } => width,
            _ => None,
        })
    }

    pub fn left_mm(&self) -> Option<LengthValue> {
        self.length(|names| &names.left_margin, |p| match p {
            Placement::RightMargin(m) | Placement::FromLeft(m) => Some(m),
            Placement::Manual { left, .. } => Some(left),
            _ => None,
        })
    }

    pub fn right_mm(&self) -> Option<LengthValue> {
        self.length(|names| &names.right_margin, |p| match p {
            Placement::LeftMargin(m) => Some(m),
            Placement::Manual { right, .. } => Some(right),
            _ => None,
        })
    }

    /// The solved value when an apply happened, else the requested one.
    fn length<N, P>(&self, name: N, requested: P) -> Option<LengthValue>
    where
        N: Fn(&TablePropertyNames) -> &String,
        P: Fn(Placement) -> Option<i32>,
    {
        let size = self.size()?;
        let solved = size.base().get(name(size.names())).and_then(|v| v.as_i32());
        solved
            .or_else(|| requested(*size.placement()))
            .map(LengthValue::from_mm100)
    }

    pub fn apply_with(&mut self, target: &mut dyn PropertyTarget, options: &ApplyOptions) -> StyleReport {
        self.inner.apply_with(target, options)
    }

    pub fn backup(&mut self, target: &dyn PropertyTarget) -> StyleReport {
        self.inner.backup(target)
    }

    pub fn restore(&mut self, target: &mut dyn PropertyTarget, clear: bool) -> StyleReport {
        self.inner.restore(target, clear)
    }
}

impl Style for TableProperties {
    fn style_name(&self) -> &str {
        self.inner.name()
    }

    fn apply_with(&mut self, target: &mut dyn PropertyTarget, options: &ApplyOptions) -> StyleReport {
        TableProperties::apply_with(self, target, options)
    }

    fn backup(&mut self, target: &dyn PropertyTarget) -> StyleReport {
        TableProperties::backup(self, target)
    }

    fn restore(&mut self, target: &mut dyn PropertyTarget, clear: bool) -> StyleReport {
        TableProperties::restore(self, target, clear)
    }

    fn attribute_names(&self) -> Vec<String> {
        self.inner.attribute_names()
    }

    fn has_backup(&self) -> bool {
        self.inner.has_backup()
    }

    fn attach_bus(&mut self, bus: &Arc<EventBus>) {
        Style::attach_bus(&mut self.inner, bus);
    }

    fn box_clone(&self) -> Box<dyn Style> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Builder for [`TableProperties`].
///
/// Lengths are absolute; percentages select relative layout. The two kinds
/// cannot be mixed.
#[derive(Debug, Clone, Default)]
pub struct TablePropertiesBuilder {
    name: Option<String>,
    align: Option<TableAlignKind>,
    width: Option<LengthValue>,
    left: Option<LengthValue>,
    right: Option<LengthValue>,
    top: Option<LengthValue>,
    bottom: Option<LengthValue>,
    rel_width: Option<u8>,
    rel_left: Option<u8>,
    rel_right: Option<u8>,
    names: Option<TablePropertyNames>,
    context: Option<FormatContext>,
}

impl TablePropertiesBuilder {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_align(mut self, align: TableAlignKind) -> Self {
        self.align = Some(align);
        self
    }

    pub fn with_width(mut self, width: LengthValue) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_left(mut self, left: LengthValue) -> Self {
        self.left = Some(left);
        self
    }

    pub fn with_right(mut self, right: LengthValue) -> Self {
        self.right = Some(right);
        self
    }

    pub fn with_top(mut self, top: LengthValue) -> Self {
        self.top = Some(top);
        self
    }

    pub fn with_bottom(mut self, bottom: LengthValue) -> Self {
        self.bottom = Some(bottom);
        self
    }

    pub fn with_relative_width(mut self, percent: u8) -> Self {
        self.rel_width = Some(percent);
        self
    }

    pub fn with_relative_left(mut self, percent: u8) -> Self {
        self.rel_left = Some(percent);
        self
    }

    pub fn with_relative_right(mut self, percent: u8) -> Self {
        self.rel_right = Some(percent);
        self
    }

    pub fn with_names(mut self, names: TablePropertyNames) -> Self {
        self.names = Some(names);
        self
    }

    pub fn with_context(mut self, context: &FormatContext) -> Self {
        self.context = Some(context.clone());
        self
    }

    fn is_relative(&self) -> bool {
        self.rel_width.is_some() || self.rel_left.is_some() || self.rel_right.is_some()
    }

    fn has_lengths(&self) -> bool {
        self.width.is_some() || self.left.is_some() || self.right.is_some()
    }

    pub fn build(self) -> Result<TableProperties> {
        if let Some(name) = &self.name {
            if name.contains(' ') {
                return Err(Error::InvalidArgument(format!(
                    "table name must not contain spaces: '{}'",
                    name
                )));
            }
        }
        let align = self.align.unwrap_or(TableAlignKind::Auto);
        let placement = if self.is_relative() {
            if self.has_lengths() {
                return Err(Error::InvalidArgument(
                    "absolute and relative sizes cannot be mixed".to_string(),
                ));
            }
            self.relative_placement(align)?
        } else {
            self.absolute_placement(align)?
        };
        let spacing = (
            self.top.map(|v| v.to_mm100()),
            self.bottom.map(|v| v.to_mm100()),
        );
        Ok(TableProperties::assemble(
            self.name.as_deref(),
            placement,
            spacing,
            self.context.as_ref(),
            self.names.clone().unwrap_or_default(),
        ))
    }

    fn absolute_placement(&self, align: TableAlignKind) -> Result<Placement> {
        let width = self.width.map(|v| v.to_mm100());
        let left = self.left.map(|v| v.to_mm100());
        let right = self.right.map(|v| v.to_mm100());
        let placement = match align {
            TableAlignKind::Auto => Some(Placement::Auto),
            TableAlignKind::Center => width
                .map(Placement::CenterWidth)
                .or(left.map(Placement::CenterMargin)),
            TableAlignKind::FromLeft => width
                .map(Placement::FromLeftWidth)
                .or(left.map(Placement::FromLeft)),
            TableAlignKind::Left => width
                .map(Placement::LeftWidth)
                .or(right.map(Placement::LeftMargin)),
            TableAlignKind::Right => width
                .map(Placement::RightWidth)
                .or(left.map(Placement::RightMargin)),
            TableAlignKind::Manual => match (width, left, right) {
                (Some(width), _, _) => Some(Placement::ManualWidth(width)),
                (None, Some(left), Some(right)) => Some(Placement::Manual {
                    left,
                    right,
                    width: None,
                }),
                _ => None,
            },
        };
        placement.ok_or_else(|| missing(align))
    }

    fn relative_placement(&self, align: TableAlignKind) -> Result<Placement> {
        let pct = |value: Option<u8>| value.map(Percent::new).transpose();
        let width = pct(self.rel_width)?;
        let left = pct(self.rel_left)?;
        let right = pct(self.rel_right)?;
        let placement = match align {
            TableAlignKind::Auto | TableAlignKind::Manual => {
                return Err(Error::InvalidArgument(format!(
                    "relative sizes are not supported for {:?} alignment",
                    align
                )));
            },
            TableAlignKind::Center => width.map(Placement::RelCenter),
            TableAlignKind::FromLeft => width.map(|width| Placement::RelFromLeft {
                width,
                left: left.unwrap_or(Percent::MIN),
            }),
            TableAlignKind::Left => width
                .map(Placement::RelLeftByWidth)
                .or(right.map(Placement::RelLeftByRight)),
            TableAlignKind::Right => width
                .map(Placement::RelRightByWidth)
                .or(left.map(Placement::RelRightByLeft)),
        };
        placement.ok_or_else(|| missing(align))
    }
}

fn missing(align: TableAlignKind) -> Error {
    Error::InvalidArgument(format!(
        "{:?} alignment needs a width or the matching margin",
        align
    ))
}
