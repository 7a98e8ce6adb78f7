use std::collections::HashMap;

use eyre::ContextCompat;
use itertools::Itertools;

use super::gate::{GateId, GateKind};
use super::pin::PinId;
use super::Circuit;
use crate::common::Point;

// 수식으로 만든 게이트가 놓이는 영역
const LAYOUT_ORIGIN: (f64, f64) = (450.0, 150.0);
const LAYOUT_STEP: (f64, f64) = (120.0, 90.0);
const LAYOUT_COLUMNS: usize = 5;

// `beam&~(green|circle)` 같은 수식을 게이트로 만들어 회로에 연결함
pub struct CircuitBuilder<'a> {
    circuit: &'a mut Circuit,
    stmt: Vec<char>,
    ptr: usize,
    sources: HashMap<String, PinId>,
    gates: Vec<GateId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CircuitTokenType {
    Ident(String),
    And,
    Or,
    Xor,
    Not,
    ParStart,
    ParEnd,
    Eof,
}

impl<'a> CircuitBuilder<'a> {
    pub fn new(circuit: &'a mut Circuit, stmt: &str) -> Self {
        CircuitBuilder {
            circuit,
            stmt: stmt.chars().collect(),
            ptr: 0,
            sources: HashMap::new(),
            gates: Vec::new(),
        }
    }

    pub fn with_source(mut self, name: &str, pin: PinId) -> Self {
        self.sources.insert(name.to_string(), pin);
        self
    }

    pub fn with_sources(mut self, sources: impl IntoIterator<Item = (String, PinId)>) -> Self {
        self.sources.extend(sources);
        self
    }

    // 수식의 결과를 sink input 핀에 연결하고 만들어진 게이트들을 반환함
    // 실패하면 그때까지 만든 게이트를 모두 지움
    pub fn build(mut self, sink: PinId) -> eyre::Result<Vec<GateId>> {
        match self.build_gates(sink) {
            Ok(()) => Ok(self.gates),
            Err(err) => {
                for &id in &self.gates {
                    self.circuit.remove_gate(id);
                }
                tracing::debug!("rolled back {} gates: {err}", self.gates.len());
                Err(err)
            }
        }
    }

    fn build_gates(&mut self, sink: PinId) -> eyre::Result<()> {
        let result = self.parse_or()?;

        let rest = self.next()?;
        eyre::ensure!(
            rest == CircuitTokenType::Eof,
            "Unexpected {rest:?} at {} in `{}`",
            self.ptr,
            self.stmt.iter().collect::<String>()
        );

        self.wire(result, sink)?;
        tracing::debug!(
            "built {} gates from `{}`",
            self.gates.len(),
            self.stmt.iter().collect::<String>()
        );

        Ok(())
    }

    fn next_ptr(&mut self) -> usize {
        let ptr = self.ptr;
        self.ptr += 1;
        ptr
    }

    fn peek_char(&self) -> Option<char> {
        self.stmt.get(self.ptr).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek_char(), Some(' ' | '\n' | '\t')) {
            self.next_ptr();
        }
    }

    fn next(&mut self) -> eyre::Result<CircuitTokenType> {
        self.skip_ws();

        let Some(ch) = self.peek_char() else {
            return Ok(CircuitTokenType::Eof);
        };
        self.next_ptr();

        let token = match ch {
            '&' => CircuitTokenType::And,
            '^' => CircuitTokenType::Xor,
            '|' => CircuitTokenType::Or,
            '(' => CircuitTokenType::ParStart,
            ')' => CircuitTokenType::ParEnd,
            '~' => CircuitTokenType::Not,
            'a'..='z' => {
                let mut result = ch.to_string();

                while let Some(ch @ ('a'..='z' | '0'..='9' | '_')) = self.peek_char() {
                    result.push(ch);
                    self.next_ptr();
                }

                CircuitTokenType::Ident(result)
            }
            _ => eyre::bail!("Unexpected character `{ch}` at {}", self.ptr - 1),
        };

        Ok(token)
    }

    fn lookup(&mut self) -> eyre::Result<CircuitTokenType> {
        let cur_ptr = self.ptr;
        let lookup = self.next();
        self.ptr = cur_ptr;
        lookup
    }

    fn source(&self, name: &str) -> eyre::Result<PinId> {
        self.sources.get(name).copied().with_context(|| {
            format!(
                "Unknown source `{name}`, available: {}",
                self.sources.keys().sorted().join(", ")
            )
        })
    }

    fn wire(&mut self, output: PinId, input: PinId) -> eyre::Result<()> {
        let drop = self.circuit.pin(input).position();
        eyre::ensure!(
            self.circuit.connect(output, input, drop),
            "Cannot connect pin {} to pin {}",
            output.0,
            input.0
        );
        Ok(())
    }

    fn new_gate(&mut self, kind: GateKind, inputs: &[PinId]) -> eyre::Result<PinId> {
        let index = self.gates.len();
        let position = Point(
            LAYOUT_ORIGIN.0 + (index % LAYOUT_COLUMNS) as f64 * LAYOUT_STEP.0,
            LAYOUT_ORIGIN.1 + (index / LAYOUT_COLUMNS) as f64 * LAYOUT_STEP.1,
        );

        let id = self.circuit.add_gate(kind, position);
        self.gates.push(id);

        let gate = self.circuit.gate(id).context("Gate was not created")?;
        let (gate_inputs, output) = (gate.input_pins().to_vec(), gate.output_pins()[0]);

        for (&from, to) in inputs.iter().zip(gate_inputs) {
            self.wire(from, to)?;
        }

        Ok(output)
    }

    // 2입력 게이트만 있으므로 왼쪽부터 묶음
    fn fold(&mut self, kind: GateKind, operands: Vec<PinId>) -> eyre::Result<PinId> {
        let mut operands = operands.into_iter();
        let mut acc = operands.next().context("Empty operand list")?;

        for operand in operands {
            acc = self.new_gate(kind, &[acc, operand])?;
        }

        Ok(acc)
    }

    fn parse_or(&mut self) -> eyre::Result<PinId> {
        let mut outputs = vec![self.parse_and()?];
        while let CircuitTokenType::Or = self.lookup()? {
            self.next()?;
            outputs.push(self.parse_and()?);
        }

        self.fold(GateKind::Or, outputs)
    }

    fn parse_and(&mut self) -> eyre::Result<PinId> {
        let mut outputs = vec![self.parse_xor()?];
        while let CircuitTokenType::And = self.lookup()? {
            self.next()?;
            outputs.push(self.parse_xor()?);
        }

        self.fold(GateKind::And, outputs)
    }

    fn parse_xor(&mut self) -> eyre::Result<PinId> {
        let mut acc = self.parse_par()?;
        while let CircuitTokenType::Xor = self.lookup()? {
            self.next()?;
            let rhs = self.parse_par()?;
            acc = self.new_xor(acc, rhs)?;
        }

        Ok(acc)
    }

    // a^b := (~a&b)|(a&~b)
    fn new_xor(&mut self, a: PinId, b: PinId) -> eyre::Result<PinId> {
        let not_a = self.new_gate(GateKind::Not, &[a])?;
        let not_b = self.new_gate(GateKind::Not, &[b])?;
        let left = self.new_gate(GateKind::And, &[not_a, b])?;
        let right = self.new_gate(GateKind::And, &[a, not_b])?;
        self.new_gate(GateKind::Or, &[left, right])
    }

    fn parse_par(&mut self) -> eyre::Result<PinId> {
        match self.next()? {
            CircuitTokenType::Ident(ident) => self.source(&ident),
            CircuitTokenType::Not => {
                let node = self.parse_par()?;
                self.new_gate(GateKind::Not, &[node])
            }
            CircuitTokenType::ParStart => {
                let node = self.parse_or()?;

                let end = self.next()?;
                eyre::ensure!(
                    end == CircuitTokenType::ParEnd,
                    "Expected `)` but found {end:?}"
                );

                Ok(node)
            }
            token => eyre::bail!("Unexpected {token:?} at {}", self.ptr),
        }
    }
}
