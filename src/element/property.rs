/// Identifies a settable property of a chart element or view.
///
/// Setters pass one of these explicitly so ownership (user vs theme) and
/// change notifications are keyed by a stable tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyId {
    IsVisible,
    Name,
    ZIndex,

    // series
    Values,
    Stroke,
    Fill,
    GeometryStroke,
    GeometryFill,
    GeometrySize,
    StackGroup,
    MaxBarWidth,
    ScalesSecondaryAt,
    ScalesPrimaryAt,
    IsClosed,

    // axes
    Position,
    IsInverted,
    UnitWidth,
    MinLimit,
    MaxLimit,
    MinStep,
    ForceStepToMin,
    TextSize,
    NameTextSize,
    LabelsPaint,
    NamePaint,
    SeparatorsPaint,

    // sections
    Xi,
    Xj,
    Yi,
    Yj,

    // view
    Series,
    XAxes,
    YAxes,
    AngleAxes,
    RadiusAxes,
    Sections,
    ControlSize,
    DrawMargin,
    Legend,
    LegendPosition,
    TooltipPosition,
    Animations,
    PolarSettings,
    DesignerMode,

    /// Property of an element type defined outside this crate.
    Custom(&'static str),
}
