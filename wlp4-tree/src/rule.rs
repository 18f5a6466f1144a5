//! Grammar productions
//!
//! The upstream parser labels every interior node with the text of the
//! production it reduced (`expr expr PLUS term`). Those strings are mapped
//! onto a closed enum here so every consumer matches exhaustively instead of
//! comparing rule text.

use std::fmt;

/// Marker used for a production with no right-hand side
pub const EMPTY_MARKER: &str = ".EMPTY";

/// Nonterminal names of the grammar
pub const NONTERMINALS: [&str; 17] = [
    "start", "procedures", "procedure", "main", "params", "paramlist", "type",
    "dcls", "dcl", "statements", "statement", "test", "expr", "term", "factor",
    "arglist", "lvalue",
];

/// Whether `symbol` names a nonterminal (and therefore starts a production line)
pub fn is_nonterminal(symbol: &str) -> bool {
    NONTERMINALS.contains(&symbol)
}

/// Every production of the WLP4 grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Start,

    ProceduresCons,
    ProceduresMain,
    Procedure,
    Main,

    ParamsEmpty,
    ParamsList,
    ParamlistOne,
    ParamlistCons,

    TypeInt,
    TypeIntStar,

    DclsEmpty,
    DclsNum,
    DclsNull,
    Dcl,

    StatementsEmpty,
    StatementsCons,
    StatementAssign,
    StatementIf,
    StatementWhile,
    StatementPrintln,
    StatementPutchar,
    StatementDelete,

    TestEq,
    TestNe,
    TestLt,
    TestLe,
    TestGe,
    TestGt,

    ExprTerm,
    ExprPlus,
    ExprMinus,

    TermFactor,
    TermStar,
    TermSlash,
    TermPct,

    FactorId,
    FactorNum,
    FactorNull,
    FactorParen,
    FactorAmp,
    FactorStar,
    FactorNew,
    FactorCall,
    FactorCallArgs,
    FactorGetchar,

    ArglistOne,
    ArglistCons,

    LvalueId,
    LvalueStar,
    LvalueParen,
}

impl Rule {
    pub const ALL: [Rule; 51] = [
        Rule::Start,
        Rule::ProceduresCons, Rule::ProceduresMain, Rule::Procedure, Rule::Main,
        Rule::ParamsEmpty, Rule::ParamsList, Rule::ParamlistOne, Rule::ParamlistCons,
        Rule::TypeInt, Rule::TypeIntStar,
        Rule::DclsEmpty, Rule::DclsNum, Rule::DclsNull, Rule::Dcl,
        Rule::StatementsEmpty, Rule::StatementsCons, Rule::StatementAssign,
        Rule::StatementIf, Rule::StatementWhile, Rule::StatementPrintln,
        Rule::StatementPutchar, Rule::StatementDelete,
        Rule::TestEq, Rule::TestNe, Rule::TestLt, Rule::TestLe, Rule::TestGe, Rule::TestGt,
        Rule::ExprTerm, Rule::ExprPlus, Rule::ExprMinus,
        Rule::TermFactor, Rule::TermStar, Rule::TermSlash, Rule::TermPct,
        Rule::FactorId, Rule::FactorNum, Rule::FactorNull, Rule::FactorParen,
        Rule::FactorAmp, Rule::FactorStar, Rule::FactorNew, Rule::FactorCall,
        Rule::FactorCallArgs, Rule::FactorGetchar,
        Rule::ArglistOne, Rule::ArglistCons,
        Rule::LvalueId, Rule::LvalueStar, Rule::LvalueParen,
    ];

    /// The production as the parser serializes it
    pub fn text(&self) -> &'static str {
        match self {
            Rule::Start => "start BOF procedures EOF",
            Rule::ProceduresCons => "procedures procedure procedures",
            Rule::ProceduresMain => "procedures main",
            Rule::Procedure => "procedure INT ID LPAREN params RPAREN LBRACE dcls statements RETURN expr SEMI RBRACE",
            Rule::Main => "main INT WAIN LPAREN dcl COMMA dcl RPAREN LBRACE dcls statements RETURN expr SEMI RBRACE",
            Rule::ParamsEmpty => "params .EMPTY",
            Rule::ParamsList => "params paramlist",
            Rule::ParamlistOne => "paramlist dcl",
            Rule::ParamlistCons => "paramlist dcl COMMA paramlist",
            Rule::TypeInt => "type INT",
            Rule::TypeIntStar => "type INT STAR",
            Rule::DclsEmpty => "dcls .EMPTY",
            Rule::DclsNum => "dcls dcls dcl BECOMES NUM SEMI",
            Rule::DclsNull => "dcls dcls dcl BECOMES NULL SEMI",
            Rule::Dcl => "dcl type ID",
            Rule::StatementsEmpty => "statements .EMPTY",
            Rule::StatementsCons => "statements statements statement",
            Rule::StatementAssign => "statement lvalue BECOMES expr SEMI",
            Rule::StatementIf => "statement IF LPAREN test RPAREN LBRACE statements RBRACE ELSE LBRACE statements RBRACE",
            Rule::StatementWhile => "statement WHILE LPAREN test RPAREN LBRACE statements RBRACE",
            Rule::StatementPrintln => "statement PRINTLN LPAREN expr RPAREN SEMI",
            Rule::StatementPutchar => "statement PUTCHAR LPAREN expr RPAREN SEMI",
            Rule::StatementDelete => "statement DELETE LBRACK RBRACK expr SEMI",
            Rule::TestEq => "test expr EQ expr",
            Rule::TestNe => "test expr NE expr",
            Rule::TestLt => "test expr LT expr",
            Rule::TestLe => "test expr LE expr",
            Rule::TestGe => "test expr GE expr",
            Rule::TestGt => "test expr GT expr",
            Rule::ExprTerm => "expr term",
            Rule::ExprPlus => "expr expr PLUS term",
            Rule::ExprMinus => "expr expr MINUS term",
            Rule::TermFactor => "term factor",
            Rule::TermStar => "term term STAR factor",
            Rule::TermSlash => "term term SLASH factor",
            Rule::TermPct => "term term PCT factor",
            Rule::FactorId => "factor ID",
            Rule::FactorNum => "factor NUM",
            Rule::FactorNull => "factor NULL",
            Rule::FactorParen => "factor LPAREN expr RPAREN",
            Rule::FactorAmp => "factor AMP lvalue",
            Rule::FactorStar => "factor STAR factor",
            Rule::FactorNew => "factor NEW INT LBRACK expr RBRACK",
            Rule::FactorCall => "factor ID LPAREN RPAREN",
            Rule::FactorCallArgs => "factor ID LPAREN arglist RPAREN",
            Rule::FactorGetchar => "factor GETCHAR LPAREN RPAREN",
            Rule::ArglistOne => "arglist expr",
            Rule::ArglistCons => "arglist expr COMMA arglist",
            Rule::LvalueId => "lvalue ID",
            Rule::LvalueStar => "lvalue STAR factor",
            Rule::LvalueParen => "lvalue LPAREN lvalue RPAREN",
        }
    }

    /// Left-hand side nonterminal
    pub fn lhs(&self) -> &'static str {
        self.text().split(' ').next().unwrap_or_default()
    }

    /// Right-hand side symbols, one per child; empty for `.EMPTY` productions
    pub fn rhs(&self) -> Vec<&'static str> {
        self.text()
            .split(' ')
            .skip(1)
            .filter(|symbol| *symbol != EMPTY_MARKER)
            .collect()
    }

    /// Number of children a node for this rule owns
    pub fn arity(&self) -> usize {
        self.rhs().len()
    }

    /// Look up a production from its serialized symbols
    pub fn from_symbols<'a>(lhs: &str, rhs: impl IntoIterator<Item = &'a str>) -> Option<Rule> {
        let mut text = lhs.to_string();
        for symbol in rhs {
            text.push(' ');
            text.push_str(symbol);
        }
        Rule::ALL.iter().copied().find(|rule| rule.text() == text)
    }

    /// Whether nodes of this rule carry a type annotation
    pub fn is_typed(&self) -> bool {
        matches!(self.lhs(), "expr" | "term" | "factor" | "lvalue")
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}
