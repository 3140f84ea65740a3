//! Token model shared by the lexer, the classifiers and the rules
//!
//! A token starts life as [`TokenKind::Unclassified`] (or as one of the
//! trivia kinds emitted directly by the lexer) and is given its grammar kind
//! exactly once by the classification pass. Each production owns a small
//! enum naming the roles its tokens can play, and [`TokenKind`] wraps them.

use std::fmt;

/// A positioned unit of source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// 1-based line number
    pub line: usize,
    /// 1-based character column
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            line: 0,
            column: 0,
        }
    }

    pub fn whitespace(width: usize) -> Self {
        Self::new(TokenKind::Whitespace, " ".repeat(width))
    }

    pub fn carriage_return(newline: &str) -> Self {
        Self::new(TokenKind::CarriageReturn, newline)
    }

    pub fn blank_line() -> Self {
        Self::new(TokenKind::BlankLine, "")
    }

    /// Whitespace, comments, line terminators and blank lines
    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }

    pub fn is_comment(&self) -> bool {
        self.kind == TokenKind::Comment
    }

    pub fn is_carriage_return(&self) -> bool {
        self.kind == TokenKind::CarriageReturn
    }

    /// Case-insensitive comparison against a lexeme
    pub fn matches(&self, text: &str) -> bool {
        self.text.eq_ignore_ascii_case(text)
    }

    /// Number of characters the token occupies on its line
    pub fn width(&self) -> usize {
        self.text.chars().count()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Grammar kind of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Produced by the lexer, waiting for classification
    Unclassified,
    Whitespace,
    Comment,
    CarriageReturn,
    BlankLine,

    LibraryClause(LibraryClause),
    UseClause(UseClause),
    ContextReference(ContextReference),
    ContextDeclaration(ContextDeclaration),
    Entity(Entity),
    Architecture(Architecture),
    Package(Package),
    PackageBody(PackageBody),

    GenericClause(InterfaceClause),
    PortClause(InterfaceClause),
    Interface(InterfaceClass, InterfacePart),
    Mode(Mode),

    Object(ObjectClass, ObjectPart),
    TypeDeclaration(TypeDeclaration),
    SubtypeDeclaration(SubtypeDeclaration),
    AliasDeclaration(AliasDeclaration),
    Component(Component),
    AttributeDeclaration(AttributeDeclaration),
    AttributeSpecification(AttributeSpecification),
    EntitySpecification(EntitySpecification),
    Subprogram(Subprogram),

    Process(Process),
    Block(Block),
    Instantiation(Instantiation),
    GenericMap(MapAspect),
    PortMap(MapAspect),
    Generate(Generate),
    ConcurrentAssignment(SignalAssignment),
    SelectedAssignment(SelectedAssignment),
    Assertion(Assertion),
    ProcedureCall(ProcedureCall),

    IfStatement(IfStatement),
    CaseStatement(CaseStatement),
    LoopStatement(LoopStatement),
    IterationScheme(IterationScheme),
    SimpleStatement(SimpleStatement),
    SequentialAssignment(SignalAssignment),
    VariableAssignment(VariableAssignment),

    SubtypeIndication(SubtypeIndication),
    Expression(Expression),
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::Comment
                | TokenKind::CarriageReturn
                | TokenKind::BlankLine
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LibraryClause {
    Keyword,
    LogicalName,
    Comma,
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UseClause {
    Keyword,
    /// Every piece of the selected name, dots included
    SelectedName,
    Comma,
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextReference {
    Keyword,
    LibraryName,
    Dot,
    ContextName,
    Comma,
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextDeclaration {
    ContextKeyword,
    Identifier,
    IsKeyword,
    EndKeyword,
    EndContextKeyword,
    ContextSimpleName,
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    EntityKeyword,
    Identifier,
    IsKeyword,
    BeginKeyword,
    EndKeyword,
    EndEntityKeyword,
    EntitySimpleName,
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    ArchitectureKeyword,
    Identifier,
    OfKeyword,
    EntityName,
    IsKeyword,
    BeginKeyword,
    EndKeyword,
    EndArchitectureKeyword,
    ArchitectureSimpleName,
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Package {
    PackageKeyword,
    Identifier,
    IsKeyword,
    EndKeyword,
    EndPackageKeyword,
    PackageSimpleName,
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageBody {
    PackageKeyword,
    BodyKeyword,
    PackageSimpleName,
    IsKeyword,
    EndKeyword,
    EndPackageKeyword,
    EndBodyKeyword,
    EndPackageSimpleName,
    Semicolon,
}

/// Shared by generic and port clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceClause {
    Keyword,
    OpenParenthesis,
    /// Separator between interface elements
    ElementSemicolon,
    CloseParenthesis,
    Semicolon,
}

/// Object class of an interface declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfaceClass {
    Signal,
    Constant,
    Variable,
    File,
    Type,
    Package,
    /// No object class keyword was written
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterfacePart {
    ClassKeyword,
    Identifier,
    Comma,
    Colon,
    BusKeyword,
    Assignment,
    IsKeyword,
    NewKeyword,
    UninstantiatedName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    In,
    Out,
    Inout,
    Buffer,
    Linkage,
}

impl Mode {
    pub fn from_text(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "in" => Some(Mode::In),
            "out" => Some(Mode::Out),
            "inout" => Some(Mode::Inout),
            "buffer" => Some(Mode::Buffer),
            "linkage" => Some(Mode::Linkage),
            _ => None,
        }
    }
}

/// Object class of a declaration in a declarative part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectClass {
    Signal,
    Constant,
    Variable,
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectPart {
    SharedKeyword,
    ClassKeyword,
    Identifier,
    Comma,
    Colon,
    /// `register` or `bus`
    SignalKind,
    Assignment,
    OpenKeyword,
    IsKeyword,
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeDeclaration {
    TypeKeyword,
    Identifier,
    IsKeyword,
    RecordKeyword,
    ElementIdentifier,
    ElementComma,
    ElementColon,
    ElementSemicolon,
    UnitsKeyword,
    UnitIdentifier,
    UnitEquals,
    UnitSemicolon,
    EndKeyword,
    EndRecordKeyword,
    EndUnitsKeyword,
    SimpleName,
    /// Tokens of a scalar, enumeration, array or access definition
    Definition,
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubtypeDeclaration {
    SubtypeKeyword,
    Identifier,
    IsKeyword,
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AliasDeclaration {
    AliasKeyword,
    Designator,
    Colon,
    IsKeyword,
    Name,
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    ComponentKeyword,
    Identifier,
    IsKeyword,
    EndKeyword,
    EndComponentKeyword,
    ComponentSimpleName,
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeDeclaration {
    AttributeKeyword,
    Identifier,
    Colon,
    TypeMark,
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeSpecification {
    AttributeKeyword,
    AttributeDesignator,
    OfKeyword,
    IsKeyword,
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntitySpecification {
    EntityDesignator,
    Comma,
    Colon,
    EntityClass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subprogram {
    /// `pure` or `impure`
    Purity,
    FunctionKeyword,
    ProcedureKeyword,
    Designator,
    OpenParenthesis,
    ParameterSemicolon,
    CloseParenthesis,
    ReturnKeyword,
    ReturnTypeMark,
    IsKeyword,
    BeginKeyword,
    EndKeyword,
    EndSubprogramKind,
    EndDesignator,
    Semicolon,
    /// `<>` or a subprogram name after `is` in an interface subprogram
    InterfaceDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Process {
    Label,
    LabelColon,
    PostponedKeyword,
    ProcessKeyword,
    OpenParenthesis,
    SensitivityName,
    SensitivityComma,
    CloseParenthesis,
    IsKeyword,
    BeginKeyword,
    EndKeyword,
    EndPostponedKeyword,
    EndProcessKeyword,
    EndLabel,
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Block {
    Label,
    LabelColon,
    BlockKeyword,
    OpenParenthesis,
    CloseParenthesis,
    IsKeyword,
    BeginKeyword,
    EndKeyword,
    EndBlockKeyword,
    EndLabel,
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instantiation {
    Label,
    LabelColon,
    /// `component`, `entity` or `configuration`
    UnitKeyword,
    UnitName,
    ArchitectureOpenParenthesis,
    ArchitectureName,
    ArchitectureCloseParenthesis,
    Semicolon,
}

/// Shared by generic map and port map aspects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapAspect {
    Keyword,
    MapKeyword,
    OpenParenthesis,
    CloseParenthesis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generate {
    Label,
    LabelColon,
    ForKeyword,
    ParameterName,
    InKeyword,
    IfKeyword,
    ElsifKeyword,
    ElseKeyword,
    AlternativeLabel,
    AlternativeLabelColon,
    GenerateKeyword,
    BeginKeyword,
    /// `end [alternative_label] ;` closing one alternative body
    AlternativeEndKeyword,
    AlternativeEndLabel,
    AlternativeSemicolon,
    EndKeyword,
    EndGenerateKeyword,
    EndLabel,
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalAssignment {
    Label,
    LabelColon,
    PostponedKeyword,
    Target,
    Assignment,
    /// `guarded`, `transport`, `reject`, `inertial` or `force`
    DelayMechanism,
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectedAssignment {
    Label,
    LabelColon,
    WithKeyword,
    SelectKeyword,
    Target,
    Assignment,
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Assertion {
    Label,
    LabelColon,
    PostponedKeyword,
    AssertKeyword,
    ReportKeyword,
    SeverityKeyword,
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcedureCall {
    Label,
    LabelColon,
    ProcedureName,
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IfStatement {
    Label,
    LabelColon,
    IfKeyword,
    ThenKeyword,
    ElsifKeyword,
    ElseKeyword,
    EndKeyword,
    EndIfKeyword,
    EndLabel,
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseStatement {
    Label,
    LabelColon,
    CaseKeyword,
    IsKeyword,
    WhenKeyword,
    Arrow,
    EndKeyword,
    EndCaseKeyword,
    EndLabel,
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopStatement {
    Label,
    LabelColon,
    LoopKeyword,
    EndKeyword,
    EndLoopKeyword,
    EndLabel,
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IterationScheme {
    WhileKeyword,
    ForKeyword,
    ParameterName,
    InKeyword,
}

/// `wait`, `return`, `null`, `exit`, `next` and `report` statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimpleStatement {
    Label,
    LabelColon,
    Keyword,
    /// `on`, `until`, `for`, `when` and `severity` clauses
    ClauseKeyword,
    LoopLabel,
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableAssignment {
    Label,
    LabelColon,
    Target,
    Assignment,
    Semicolon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubtypeIndication {
    ResolutionFunction,
    TypeMark,
    RangeKeyword,
    Direction,
    OpenParenthesis,
    CloseParenthesis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expression {
    Name,
    Literal,
    Operator,
    /// Reserved words used inside expressions (`others`, `open`, `when`, ...)
    Keyword,
    OpenParenthesis,
    CloseParenthesis,
    Comma,
    Tick,
    Dot,
    Association,
}
