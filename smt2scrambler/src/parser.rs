// Copyright (c) Facebook, Inc. and its affiliates
// SPDX-License-Identifier: MIT OR Apache-2.0

use structopt::StructOpt;

use crate::{
    error::{RawError, RawResult, Result},
    lexer::{Lexer, Token},
    syntax::{Node, ANNOTATION, INDEXED, NAMED, PATTERN, QUALIFIED},
};

// https://github.com/TeXitoi/structopt/issues/333
#[cfg_attr(not(doc), allow(missing_docs))]
#[cfg_attr(doc, doc = "Configuration for the parsing of SMT2 scripts.")]
#[derive(Debug, Default, Clone, StructOpt)]
pub struct ParserConfig {
    /// Accept commands outside of the SMT-COMP subset (get-value, echo, reset, ...).
    #[structopt(long)]
    pub support_non_smtcomp: bool,
    /// Accept any other command (e.g. Z3 extensions) and read its arguments as terms.
    #[structopt(long)]
    pub support_z3: bool,
}

/// Commands used in SMT-COMP benchmarks.
const SMTCOMP_COMMANDS: &[&str] = &[
    "assert",
    "check-sat",
    "declare-const",
    "declare-datatype",
    "declare-datatypes",
    "declare-fun",
    "declare-sort",
    "define-fun",
    "define-fun-rec",
    "define-funs-rec",
    "define-sort",
    "exit",
    "get-model",
    "get-proof",
    "get-unsat-core",
    "pop",
    "push",
    "set-info",
    "set-logic",
    "set-option",
];

/// Other standard SMT2 commands.
const NON_SMTCOMP_COMMANDS: &[&str] = &[
    "check-sat-assuming",
    "echo",
    "get-assertions",
    "get-assignment",
    "get-info",
    "get-option",
    "get-unsat-assumptions",
    "get-value",
    "reset",
    "reset-assertions",
];

/// Parser for SMT2 scripts.
pub struct Parser<R, S> {
    config: ParserConfig,
    lexer: Lexer<R>,
    state: S,
}

/// Actions taken when visiting an SMT2 script.
pub trait ScriptVisitor {
    /// Called once at every binding occurrence of a symbol, in source order.
    fn declare_name(&mut self, symbol: &str);

    fn set_logic(&mut self, logic: &str) -> RawResult<()>;

    /// Called with each complete top-level command, in source order.
    fn add_command(&mut self, command: Node) -> RawResult<()>;
}

/// Unprocessed S-expression.
#[derive(Clone, Debug, PartialEq, Eq)]
enum SExpr {
    Atom(Token),
    List(Vec<SExpr>),
}

impl std::fmt::Display for SExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SExpr::Atom(token) => write!(f, "{}", token.text()),
            SExpr::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}

fn symbol(e: &SExpr) -> RawResult<&str> {
    match e {
        SExpr::Atom(Token::Symbol(s)) => Ok(s),
        _ => Err(RawError::ExpectedSymbol(e.to_string())),
    }
}

fn list(e: &SExpr) -> RawResult<&[SExpr]> {
    match e {
        SExpr::List(items) => Ok(items),
        _ => Err(RawError::ExpectedList(e.to_string())),
    }
}

/// Uninterpreted data (option values, indices, etc) printed verbatim.
fn datum(e: &SExpr) -> Node {
    match e {
        SExpr::Atom(token) => Node::leaf(token.text()),
        SExpr::List(items) => Node::list(items.iter().map(datum).collect()),
    }
}

impl<R, S> Parser<R, S> {
    pub fn new(config: ParserConfig, lexer: Lexer<R>, state: S) -> Self {
        Self {
            config,
            lexer,
            state,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    pub fn into_state(self) -> S {
        self.state
    }

    fn check_supported(&self, command: &str) -> RawResult<()> {
        let supported = SMTCOMP_COMMANDS.contains(&command)
            || (NON_SMTCOMP_COMMANDS.contains(&command) && self.config.support_non_smtcomp)
            || (!NON_SMTCOMP_COMMANDS.contains(&command) && self.config.support_z3);
        if supported {
            Ok(())
        } else {
            Err(RawError::UnsupportedCommand(command.to_string()))
        }
    }
}

impl<R, S> Parser<R, S>
where
    R: std::io::BufRead,
    S: ScriptVisitor,
{
    /// Parse the input.
    pub fn parse(&mut self) -> Result<()> {
        while self.parse_command()? {}
        Ok(())
    }

    /// Parse one command of the input. Return `false` at the end of the input.
    pub fn parse_command(&mut self) -> Result<bool> {
        self.read_command().map_err(|e| self.lexer.make_error(e))
    }

    fn read_command(&mut self) -> RawResult<bool> {
        let items = match self.read_list()? {
            Some(items) => items,
            None => return Ok(false),
        };
        let command = self.command(&items)?;
        self.state.add_command(command)?;
        Ok(true)
    }

    /// Read the next top-level parenthesized expression.
    fn read_list(&mut self) -> RawResult<Option<Vec<SExpr>>> {
        match self.lexer.next_token()? {
            None => return Ok(None),
            Some(Token::LeftParen) => (),
            Some(Token::RightParen) => return Err(RawError::UnbalancedParen),
            Some(token) => return Err(RawError::ExpectedCommand(token.text().to_string())),
        }
        let mut parents: Vec<Vec<SExpr>> = Vec::new();
        let mut current = Vec::new();
        loop {
            match self.lexer.next_token()? {
                None => return Err(RawError::UnexpectedEndOfInput),
                Some(Token::LeftParen) => parents.push(std::mem::take(&mut current)),
                Some(Token::RightParen) => {
                    let done = std::mem::take(&mut current);
                    match parents.pop() {
                        Some(parent) => {
                            current = parent;
                            current.push(SExpr::List(done));
                        }
                        None => return Ok(Some(done)),
                    }
                }
                Some(token) => current.push(SExpr::Atom(token)),
            }
        }
    }

    fn command(&mut self, items: &[SExpr]) -> RawResult<Node> {
        let (head, args) = match items.split_first() {
            Some((SExpr::Atom(Token::Symbol(s)), args)) => (s.as_str(), args),
            Some((e, _)) => return Err(RawError::ExpectedCommand(e.to_string())),
            None => return Err(RawError::ExpectedCommand("()".to_string())),
        };
        self.check_supported(head)?;
        let children = match (head, args) {
            // ( set-logic ⟨symbol⟩ )
            ("set-logic", [logic]) => {
                let logic = symbol(logic)?;
                self.state.set_logic(logic)?;
                vec![Node::leaf(logic)]
            }
            // ( set-info ⟨attribute⟩ ) and ( set-option ⟨option⟩ )
            ("set-info", _) | ("set-option", _) => args.iter().map(datum).collect(),
            // ( declare-sort ⟨symbol⟩ ⟨numeral⟩ )
            ("declare-sort", [s]) => vec![self.declare(s)?],
            ("declare-sort", [s, arity]) => vec![self.declare(s)?, datum(arity)],
            // ( define-sort ⟨symbol⟩ ( ⟨symbol⟩∗ ) ⟨sort⟩ )
            ("define-sort", [s, params, sort]) => {
                let s = self.declare(s)?;
                let params = self.declare_all(params)?;
                vec![s, params, self.sort(sort)?]
            }
            // ( declare-fun ⟨symbol⟩ ( ⟨sort⟩∗ ) ⟨sort⟩ )
            ("declare-fun", [f, params, sort]) => {
                let f = self.declare(f)?;
                let params = self.sorts(params)?;
                vec![f, params, self.sort(sort)?]
            }
            // ( declare-const ⟨symbol⟩ ⟨sort⟩ )
            ("declare-const", [c, sort]) => vec![self.declare(c)?, self.sort(sort)?],
            // ( define-fun ⟨function_dec⟩ ⟨term⟩ ), same for define-fun-rec
            ("define-fun", [f, params, sort, body]) | ("define-fun-rec", [f, params, sort, body]) => {
                let f = self.declare(f)?;
                let params = self.sorted_vars(params)?;
                let sort = self.sort(sort)?;
                vec![f, params, sort, self.term(body)?]
            }
            // ( define-funs-rec ( ( ⟨function_dec⟩ )n+1 ) ( ⟨term⟩n+1 ) )
            ("define-funs-rec", [decs, bodies]) => {
                let decs = list(decs)?
                    .iter()
                    .map(|d| self.function_dec(d))
                    .collect::<RawResult<Vec<_>>>()?;
                vec![Node::list(decs), self.terms(bodies)?]
            }
            // ( declare-datatype ⟨symbol⟩ ⟨datatype_dec⟩ )
            ("declare-datatype", [d, dec]) => {
                let d = self.declare(d)?;
                vec![d, self.datatype_dec(dec)?]
            }
            // ( declare-datatypes ( ⟨sort_dec⟩n+1 ) ( ⟨datatype_dec⟩n+1 ) )
            ("declare-datatypes", [sorts, decs]) => {
                let sorts = list(sorts)?
                    .iter()
                    .map(|s| self.sort_dec(s))
                    .collect::<RawResult<Vec<_>>>()?;
                let decs = list(decs)?
                    .iter()
                    .map(|d| self.datatype_dec(d))
                    .collect::<RawResult<Vec<_>>>()?;
                vec![Node::list(sorts), Node::list(decs)]
            }
            // ( assert ⟨term⟩ )
            ("assert", [t]) => vec![self.term(t)?],
            // ( push ⟨numeral⟩ ) and ( pop ⟨numeral⟩ )
            ("push", _) | ("pop", _) if args.len() <= 1 => args.iter().map(datum).collect(),
            // ( get-value ( ⟨term⟩+ ) ) and ( check-sat-assuming ( ⟨prop_literal⟩∗ ) )
            ("get-value", [terms]) | ("check-sat-assuming", [terms]) => vec![self.terms(terms)?],
            // ( get-info ⟨info_flag⟩ ), ( get-option ⟨keyword⟩ ), ( echo ⟨string⟩ )
            ("get-info", [x]) | ("get-option", [x]) | ("echo", [x]) => vec![datum(x)],
            ("check-sat", [])
            | ("exit", [])
            | ("get-assertions", [])
            | ("get-assignment", [])
            | ("get-model", [])
            | ("get-proof", [])
            | ("get-unsat-assumptions", [])
            | ("get-unsat-core", [])
            | ("reset", [])
            | ("reset-assertions", []) => Vec::new(),
            _ if SMTCOMP_COMMANDS.contains(&head) || NON_SMTCOMP_COMMANDS.contains(&head) => {
                return Err(RawError::MalformedCommand(head.to_string()));
            }
            // Extensions.
            _ => args
                .iter()
                .map(|a| self.term(a))
                .collect::<RawResult<Vec<_>>>()?,
        };
        Ok(Node::command(head, children))
    }

    fn declare(&mut self, e: &SExpr) -> RawResult<Node> {
        let s = symbol(e)?;
        self.state.declare_name(s);
        Ok(Node::name(s))
    }

    fn declare_all(&mut self, e: &SExpr) -> RawResult<Node> {
        let names = list(e)?
            .iter()
            .map(|s| self.declare(s))
            .collect::<RawResult<Vec<_>>>()?;
        Ok(Node::list(names))
    }

    // sort ::= ⟨identifier⟩ | ( ⟨identifier⟩ ⟨sort⟩+ )
    fn sort(&mut self, e: &SExpr) -> RawResult<Node> {
        match e {
            SExpr::Atom(Token::Symbol(s)) => Ok(Node::name(s.as_str())),
            SExpr::Atom(_) => Err(RawError::ExpectedSymbol(e.to_string())),
            SExpr::List(items) => match items.split_first() {
                Some((SExpr::Atom(Token::Symbol(s)), args)) if s == INDEXED => {
                    Ok(Node::command(INDEXED, args.iter().map(datum).collect()))
                }
                Some((SExpr::Atom(Token::Symbol(s)), args)) => {
                    let args = args
                        .iter()
                        .map(|a| self.sort(a))
                        .collect::<RawResult<Vec<_>>>()?;
                    Ok(Node::application(s.as_str(), args))
                }
                _ => Err(RawError::ExpectedSymbol(e.to_string())),
            },
        }
    }

    fn sorts(&mut self, e: &SExpr) -> RawResult<Node> {
        let sorts = list(e)?
            .iter()
            .map(|s| self.sort(s))
            .collect::<RawResult<Vec<_>>>()?;
        Ok(Node::list(sorts))
    }

    // sorted_var ::= ( ⟨symbol⟩ ⟨sort⟩ )
    fn sorted_var(&mut self, e: &SExpr) -> RawResult<Node> {
        match list(e)? {
            [v, sort] => {
                let v = symbol(v)?;
                self.state.declare_name(v);
                Ok(Node::application(v, vec![self.sort(sort)?]))
            }
            _ => Err(RawError::MalformedTerm(e.to_string())),
        }
    }

    fn sorted_vars(&mut self, e: &SExpr) -> RawResult<Node> {
        let vars = list(e)?
            .iter()
            .map(|v| self.sorted_var(v))
            .collect::<RawResult<Vec<_>>>()?;
        Ok(Node::list(vars))
    }

    // function_dec ::= ⟨symbol⟩ ( ⟨sorted_var⟩∗ ) ⟨sort⟩
    fn function_dec(&mut self, e: &SExpr) -> RawResult<Node> {
        match list(e)? {
            [f, params, sort] => {
                let f = symbol(f)?;
                self.state.declare_name(f);
                let params = self.sorted_vars(params)?;
                Ok(Node::application(f, vec![params, self.sort(sort)?]))
            }
            _ => Err(RawError::MalformedTerm(e.to_string())),
        }
    }

    // sort_dec ::= ( ⟨symbol⟩ ⟨numeral⟩ )
    fn sort_dec(&mut self, e: &SExpr) -> RawResult<Node> {
        match list(e)? {
            [s, arity] => {
                let s = symbol(s)?;
                self.state.declare_name(s);
                Ok(Node::application(s, vec![datum(arity)]))
            }
            _ => Err(RawError::MalformedTerm(e.to_string())),
        }
    }

    // datatype_dec ::= ( ⟨constructor_dec⟩+ ) | ( par ( ⟨symbol⟩+ ) ( ⟨constructor_dec⟩+ ) )
    fn datatype_dec(&mut self, e: &SExpr) -> RawResult<Node> {
        let items = list(e)?;
        if let [SExpr::Atom(Token::Symbol(par)), params, constructors] = items {
            if par == "par" {
                let params = self.declare_all(params)?;
                let constructors = self.constructor_decs(list(constructors)?)?;
                return Ok(Node::command("par", vec![params, constructors]));
            }
        }
        self.constructor_decs(items)
    }

    fn constructor_decs(&mut self, items: &[SExpr]) -> RawResult<Node> {
        let constructors = items
            .iter()
            .map(|c| self.constructor_dec(c))
            .collect::<RawResult<Vec<_>>>()?;
        Ok(Node::list(constructors))
    }

    // constructor_dec ::= ( ⟨symbol⟩ ⟨selector_dec⟩∗ )
    // selector_dec ::= ( ⟨symbol⟩ ⟨sort⟩ )
    fn constructor_dec(&mut self, e: &SExpr) -> RawResult<Node> {
        match list(e)?.split_first() {
            Some((c, selectors)) => {
                let c = symbol(c)?;
                self.state.declare_name(c);
                let selectors = selectors
                    .iter()
                    .map(|s| self.sorted_var(s))
                    .collect::<RawResult<Vec<_>>>()?;
                Ok(Node::application(c, selectors))
            }
            None => Err(RawError::MalformedTerm(e.to_string())),
        }
    }

    fn terms(&mut self, e: &SExpr) -> RawResult<Node> {
        let terms = self.term_list(list(e)?)?;
        Ok(Node::list(terms))
    }

    fn term_list(&mut self, items: &[SExpr]) -> RawResult<Vec<Node>> {
        items.iter().map(|t| self.term(t)).collect()
    }

    fn term(&mut self, e: &SExpr) -> RawResult<Node> {
        let items = match e {
            SExpr::Atom(Token::Symbol(s)) => return Ok(Node::name(s.as_str())),
            SExpr::Atom(token) => return Ok(Node::leaf(token.text())),
            SExpr::List(items) => items,
        };
        let (head, args) = match items.split_first() {
            Some((SExpr::Atom(Token::Symbol(s)), args)) => (s.as_str(), args),
            Some((head @ SExpr::List(_), args)) => {
                // ( (_ extract 3 0) x ), ( (as const (Array Int Int)) 0 ), ...
                let mut children = vec![self.term(head)?];
                children.extend(self.term_list(args)?);
                return Ok(Node::list(children));
            }
            Some((head, _)) => return Err(RawError::ExpectedSymbol(head.to_string())),
            None => return Err(RawError::MalformedTerm(e.to_string())),
        };
        match (head, args) {
            // ( let ( ⟨var_binding⟩+ ) ⟨term⟩ )
            ("let", [bindings, body]) => {
                let bindings = list(bindings)?
                    .iter()
                    .map(|b| self.var_binding(b))
                    .collect::<RawResult<Vec<_>>>()?;
                Ok(Node::command(head, vec![Node::list(bindings), self.term(body)?]))
            }
            // ( forall ( ⟨sorted_var⟩+ ) ⟨term⟩ ), same for exists
            ("forall", [vars, body]) | ("exists", [vars, body]) => {
                let vars = self.sorted_vars(vars)?;
                Ok(Node::command(head, vec![vars, self.term(body)?]))
            }
            // ( match ⟨term⟩ ( ⟨match_case⟩+ ) )
            ("match", [t, cases]) => {
                let t = self.term(t)?;
                let cases = list(cases)?
                    .iter()
                    .map(|c| self.match_case(c))
                    .collect::<RawResult<Vec<_>>>()?;
                Ok(Node::command(head, vec![t, Node::list(cases)]))
            }
            // ( ! ⟨term⟩ ⟨attribute⟩+ )
            (ANNOTATION, [t, attributes @ ..]) => {
                let mut children = vec![self.term(t)?];
                children.extend(self.attributes(attributes)?);
                Ok(Node::command(head, children))
            }
            // ( _ ⟨symbol⟩ ⟨index⟩+ )
            (INDEXED, [_, ..]) => Ok(Node::command(head, args.iter().map(datum).collect())),
            // ( as ⟨identifier⟩ ⟨sort⟩ )
            (QUALIFIED, [f, sort]) => {
                let f = match f {
                    SExpr::Atom(Token::Symbol(s)) => Node::name(s.as_str()),
                    _ => datum(f),
                };
                Ok(Node::command(head, vec![f, self.sort(sort)?]))
            }
            ("let", _)
            | ("forall", _)
            | ("exists", _)
            | ("match", _)
            | (ANNOTATION, _)
            | (INDEXED, _)
            | (QUALIFIED, _) => Err(RawError::MalformedTerm(e.to_string())),
            // ( ⟨qual_identifier⟩ ⟨term⟩+ )
            _ => Ok(Node::application(head, self.term_list(args)?)),
        }
    }

    // var_binding ::= ( ⟨symbol⟩ ⟨term⟩ )
    fn var_binding(&mut self, e: &SExpr) -> RawResult<Node> {
        match list(e)? {
            [v, t] => {
                let v = symbol(v)?;
                self.state.declare_name(v);
                Ok(Node::application(v, vec![self.term(t)?]))
            }
            _ => Err(RawError::MalformedTerm(e.to_string())),
        }
    }

    // match_case ::= ( ⟨pattern⟩ ⟨term⟩ )
    // pattern ::= ⟨symbol⟩ | ( ⟨symbol⟩ ⟨symbol⟩+ )
    fn match_case(&mut self, e: &SExpr) -> RawResult<Node> {
        let (pattern, t) = match list(e)? {
            [pattern, t] => (pattern, t),
            _ => return Err(RawError::MalformedTerm(e.to_string())),
        };
        let pattern = match pattern {
            SExpr::List(items) => match items.split_first() {
                Some((constructor, vars)) => {
                    let constructor = symbol(constructor)?;
                    let vars = vars
                        .iter()
                        .map(|v| self.declare(v))
                        .collect::<RawResult<Vec<_>>>()?;
                    Node::application(constructor, vars)
                }
                None => return Err(RawError::MalformedTerm(e.to_string())),
            },
            _ => self.declare(pattern)?,
        };
        Ok(Node::list(vec![pattern, self.term(t)?]))
    }

    // attribute ::= ⟨keyword⟩ | ⟨keyword⟩ ⟨attribute_value⟩
    fn attributes(&mut self, items: &[SExpr]) -> RawResult<Vec<Node>> {
        let mut attributes = Vec::new();
        let mut items = items.iter().peekable();
        while let Some(item) = items.next() {
            let keyword = match item {
                SExpr::Atom(Token::Keyword(k)) => k.as_str(),
                _ => return Err(RawError::ExpectedKeyword(item.to_string())),
            };
            let has_value =
                matches!(items.peek(), Some(next) if !matches!(next, SExpr::Atom(Token::Keyword(_))));
            let value = if has_value { items.next() } else { None };
            let value = match value {
                Some(v) if keyword == NAMED => Some(self.declare(v)?),
                Some(v) if keyword == PATTERN => Some(self.terms(v)?),
                Some(v) => Some(datum(v)),
                None => None,
            };
            attributes.push(Node::attribute(keyword, value));
        }
        Ok(attributes)
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
struct Recorder {
    declared: Vec<String>,
    logic: Option<String>,
    commands: Vec<Node>,
}

#[cfg(test)]
impl ScriptVisitor for Recorder {
    fn declare_name(&mut self, symbol: &str) {
        self.declared.push(symbol.to_string());
    }

    fn set_logic(&mut self, logic: &str) -> RawResult<()> {
        if let Some(current) = &self.logic {
            return Err(RawError::LogicAlreadySet(current.clone()));
        }
        self.logic = Some(logic.to_string());
        Ok(())
    }

    fn add_command(&mut self, command: Node) -> RawResult<()> {
        self.commands.push(command);
        Ok(())
    }
}

#[cfg(test)]
fn parse_with(config: ParserConfig, input: &str) -> Result<Recorder> {
    let lexer = Lexer::new(Some("test.smt2".to_string()), input.as_bytes());
    let mut parser = Parser::new(config, lexer, Recorder::default());
    parser.parse()?;
    Ok(parser.into_state())
}

#[cfg(test)]
fn parse(input: &str) -> Result<Recorder> {
    parse_with(ParserConfig::default(), input)
}

#[test]
fn test_declarations_in_source_order() {
    let script = parse(
        r#"
(set-logic UF)
(declare-sort U 0)
(declare-fun f (U) Bool)
(declare-const c U)
(define-fun g ((x U)) Bool (f x))
(assert (let ((y c)) (forall ((z U)) (! (= y z) :named a1))))
(check-sat)
"#,
    )
    .unwrap();
    assert_eq!(script.logic.as_deref(), Some("UF"));
    assert_eq!(
        script.declared,
        vec!["U", "f", "c", "g", "x", "y", "z", "a1"]
    );
    let symbols: Vec<_> = script.commands.iter().map(|c| c.symbol.as_str()).collect();
    assert_eq!(
        symbols,
        vec![
            "set-logic",
            "declare-sort",
            "declare-fun",
            "declare-const",
            "define-fun",
            "assert",
            "check-sat"
        ]
    );
}

#[test]
fn test_datatype_declarations() {
    let script = parse(
        "(declare-datatypes ((List 1)) ((par (T) ((nil) (cons (hd T) (tl (List T)))))))\n\
         (declare-datatype Color ((red) (green)))\n\
         (assert (match l ((nil true) ((cons h t) false))))",
    )
    .unwrap();
    assert_eq!(
        script.declared,
        vec!["List", "T", "nil", "cons", "hd", "tl", "Color", "red", "green", "nil", "h", "t"]
    );
}

#[test]
fn test_name_marking() {
    let script = parse("(assert (f x 1 (_ bv5 8) (! p :named n)))").unwrap();
    let term = &script.commands[0].children[0];
    assert!(term.is_name && term.needs_parens);
    assert_eq!(term.symbol, "f");
    assert!(term.children[0].is_name);
    assert!(!term.children[1].is_name);
    let indexed = &term.children[2];
    assert!(indexed.is(INDEXED) && !indexed.is_name);
    assert!(indexed.children.iter().all(|c| !c.is_name));
    let annotation = &term.children[3];
    assert!(annotation.is(ANNOTATION));
    assert!(!annotation.children[1].is_name && !annotation.children[1].needs_parens);
    assert!(annotation.children[1].children[0].is_name);
}

#[test]
fn test_aggregation_terms() {
    let script =
        parse("(assert (= ((_ extract 3 0) v) ((as const (Array Int Int)) 0)))").unwrap();
    let eq = &script.commands[0].children[0];
    let extract = &eq.children[0];
    assert_eq!(extract.symbol, "");
    assert_eq!(extract.operand_offset(), Some(1));
    let constant = &eq.children[1];
    assert_eq!(constant.operator_symbol(), "const");
    assert!(constant.children[0].children[1].is_name);
}

#[test]
fn test_command_acceptance() {
    assert!(matches!(
        parse("(get-value (x))"),
        Err(e) if e.error == RawError::UnsupportedCommand("get-value".into())
    ));
    let config = ParserConfig {
        support_non_smtcomp: true,
        ..ParserConfig::default()
    };
    assert!(parse_with(config.clone(), "(get-value (x))").is_ok());
    assert!(parse_with(config, "(declare-rel R (Int))").is_err());

    let config = ParserConfig {
        support_z3: true,
        ..ParserConfig::default()
    };
    let script = parse_with(config.clone(), "(declare-rel R (Int))").unwrap();
    assert_eq!(script.commands[0].symbol, "declare-rel");
    assert!(parse_with(config, "(echo \"hi\")").is_err());
}

#[test]
fn test_errors() {
    let e = parse("(set-logic QF_UF)\n(assert (> x 0)").unwrap_err();
    assert_eq!(e.error, RawError::UnexpectedEndOfInput);
    assert_eq!(e.position.line, 1);

    let e = parse(")").unwrap_err();
    assert_eq!(e.error, RawError::UnbalancedParen);

    let e = parse("(assert x y)").unwrap_err();
    assert_eq!(e.error, RawError::MalformedCommand("assert".into()));

    let e = parse("(set-logic A)(set-logic B)").unwrap_err();
    assert_eq!(e.error, RawError::LogicAlreadySet("A".into()));

    let e = parse("check-sat").unwrap_err();
    assert_eq!(e.error, RawError::ExpectedCommand("check-sat".into()));
}
