//! Paint Expressions
//!
//! A typed subset of the MapLibre/Mapbox expression language. Builders
//! produce `Expr` trees; serialization turns them into the nested JSON
//! arrays renderers evaluate on the GPU side. `eval` mirrors renderer
//! semantics closely enough to check paint rules against the classifier.

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::classify::{BoundConvention, ClassTable};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CmpOp {
    Eq,
    Le,
    Lt,
}

impl CmpOp {
    fn name(&self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Le => "<=",
            CmpOp::Lt => "<",
        }
    }
}

impl From<BoundConvention> for CmpOp {
    fn from(c: BoundConvention) -> Self {
        match c {
            BoundConvention::Inclusive => CmpOp::Le,
            BoundConvention::Strict => CmpOp::Lt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Linear,
    Exponential(f64),
    CubicBezier([f64; 4]),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    /// Feature property lookup
    Get(String),
    /// Numeric coercion with a fallback for null / non-numeric input
    ToNumber(Box<Expr>, f64),
    ToStr(Box<Expr>),
    Compare(CmpOp, Box<Expr>, Box<Expr>),
    /// First true condition wins, else `fallback`
    Case { branches: Vec<(Expr, Expr)>, fallback: Box<Expr> },
    /// Lower-inclusive thresholds: `input >= stop` selects that stop's output
    Step { input: Box<Expr>, base: Box<Expr>, stops: Vec<(f64, Expr)> },
    Interpolate { curve: Curve, input: Box<Expr>, stops: Vec<(f64, f64)> },
    Ln(Box<Expr>),
    Max(Box<Expr>, Box<Expr>),
}

pub fn lit(v: impl Into<Value>) -> Expr {
    Expr::Literal(v.into())
}

pub fn get(property: &str) -> Expr {
    Expr::Get(property.to_string())
}

/// Numeric property, null / missing read as `fallback`.
pub fn number(property: &str, fallback: f64) -> Expr {
    Expr::ToNumber(Box::new(get(property)), fallback)
}

impl Expr {
    /// `case` over a breakpoint table. Bounds and classes come straight from
    /// the table so the renderer and the Rust classifier cannot drift.
    pub fn classify<T: Copy>(
        input: Expr,
        table: &ClassTable<T>,
        convention: BoundConvention,
        output: impl Fn(T) -> Expr,
    ) -> Expr {
        let op = CmpOp::from(convention);
        let branches = table
            .stops
            .iter()
            .map(|(bound, class)| {
                (Expr::Compare(op, Box::new(input.clone()), Box::new(lit(*bound))), output(*class))
            })
            .collect();
        Expr::Case { branches, fallback: Box::new(output(table.overflow)) }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Expr::Literal(v) => match v {
                // Bare arrays would be parsed as expressions
                Value::Array(_) => json!(["literal", v]),
                _ => v.clone(),
            },
            Expr::Get(p) => json!(["get", p]),
            Expr::ToNumber(e, fallback) => json!(["to-number", e.to_json(), fallback]),
            Expr::ToStr(e) => json!(["to-string", e.to_json()]),
            Expr::Compare(op, a, b) => json!([op.name(), a.to_json(), b.to_json()]),
            Expr::Case { branches, fallback } => {
                let mut out = vec![json!("case")];
                for (cond, value) in branches {
                    out.push(cond.to_json());
                    out.push(value.to_json());
                }
                out.push(fallback.to_json());
                Value::Array(out)
            }
            Expr::Step { input, base, stops } => {
                let mut out = vec![json!("step"), input.to_json(), base.to_json()];
                for (threshold, value) in stops {
                    out.push(json!(threshold));
                    out.push(value.to_json());
                }
                Value::Array(out)
            }
            Expr::Interpolate { curve, input, stops } => {
                let curve = match curve {
                    Curve::Linear => json!(["linear"]),
                    Curve::Exponential(base) => json!(["exponential", base]),
                    Curve::CubicBezier(p) => json!(["cubic-bezier", p[0], p[1], p[2], p[3]]),
                };
                let mut out = vec![json!("interpolate"), curve, input.to_json()];
                for (x, y) in stops {
                    out.push(json!(x));
                    out.push(json!(y));
                }
                Value::Array(out)
            }
            Expr::Ln(e) => json!(["ln", e.to_json()]),
            Expr::Max(a, b) => json!(["max", a.to_json(), b.to_json()]),
        }
    }

    /// Evaluate against one feature's properties. Missing properties are null;
    /// comparisons involving null are false.
    pub fn eval(&self, props: &Map<String, Value>) -> Value {
        match self {
            Expr::Literal(v) => v.clone(),
            Expr::Get(p) => props.get(p).cloned().unwrap_or(Value::Null),
            Expr::ToNumber(e, fallback) => {
                let v = e.eval(props);
                json!(as_number(&v).unwrap_or(*fallback))
            }
            Expr::ToStr(e) => match e.eval(props) {
                Value::String(s) => Value::String(s),
                Value::Null => Value::String(String::new()),
                other => Value::String(other.to_string()),
            },
            Expr::Compare(op, a, b) => {
                let (a, b) = (a.eval(props), b.eval(props));
                let result = match op {
                    CmpOp::Eq => match (as_number(&a), as_number(&b)) {
                        (Some(x), Some(y)) => x == y,
                        _ => a == b,
                    },
                    CmpOp::Le | CmpOp::Lt => match (as_number(&a), as_number(&b)) {
                        (Some(x), Some(y)) if *op == CmpOp::Le => x <= y,
                        (Some(x), Some(y)) => x < y,
                        _ => false,
                    },
                };
                Value::Bool(result)
            }
            Expr::Case { branches, fallback } => branches
                .iter()
                .find(|(cond, _)| cond.eval(props) == Value::Bool(true))
                .map(|(_, v)| v.eval(props))
                .unwrap_or_else(|| fallback.eval(props)),
            Expr::Step { input, base, stops } => {
                let x = as_number(&input.eval(props));
                let mut out: &Expr = base;
                if let Some(x) = x {
                    for (threshold, value) in stops {
                        if x >= *threshold {
                            out = value;
                        }
                    }
                }
                out.eval(props)
            }
            Expr::Interpolate { curve, input, stops } => {
                match as_number(&input.eval(props)) {
                    Some(x) => json!(interpolate(*curve, x, stops)),
                    None => Value::Null,
                }
            }
            Expr::Ln(e) => match as_number(&e.eval(props)) {
                Some(x) => json!(x.ln()),
                None => Value::Null,
            },
            Expr::Max(a, b) => match (as_number(&a.eval(props)), as_number(&b.eval(props))) {
                (Some(x), Some(y)) => json!(x.max(y)),
                _ => Value::Null,
            },
        }
    }
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

fn as_number(v: &Value) -> Option<f64> {
    v.as_f64()
}

fn interpolate(curve: Curve, x: f64, stops: &[(f64, f64)]) -> f64 {
    let (first, last) = match (stops.first(), stops.last()) {
        (Some(f), Some(l)) => (*f, *l),
        _ => return f64::NAN,
    };
    if x <= first.0 {
        return first.1;
    }
    if x >= last.0 {
        return last.1;
    }
    for pair in stops.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        if x >= x0 && x <= x1 {
            let t = (x - x0) / (x1 - x0);
            let t = match curve {
                Curve::Linear => t,
                Curve::Exponential(base) if (base - 1.0).abs() > f64::EPSILON => {
                    (base.powf(t * (x1 - x0)) - 1.0) / (base.powf(x1 - x0) - 1.0)
                }
                Curve::Exponential(_) => t,
                // Renderers solve the bezier; the linear fallback is good enough for checks
                Curve::CubicBezier(_) => t,
            };
            return y0 + t * (y1 - y0);
        }
    }
    last.1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_case_serialization_shape() {
        let e = Expr::Case {
            branches: vec![(Expr::Compare(CmpOp::Le, Box::new(get("index")), Box::new(lit(0.0))), lit("none"))],
            fallback: Box::new(lit("some")),
        };
        assert_eq!(e.to_json(), json!(["case", ["<=", ["get", "index"], 0.0], "none", "some"]));
    }

    #[test]
    fn test_array_literals_are_wrapped() {
        assert_eq!(lit(json!([1, 2])).to_json(), json!(["literal", [1, 2]]));
    }

    #[test]
    fn test_step_is_lower_inclusive() {
        let e = Expr::Step {
            input: Box::new(number("score", 0.0)),
            base: Box::new(lit("a")),
            stops: vec![(600.0, lit("b")), (1200.0, lit("c"))],
        };
        assert_eq!(e.eval(&props(json!({"score": 599}))), json!("a"));
        assert_eq!(e.eval(&props(json!({"score": 600}))), json!("b"));
        assert_eq!(e.eval(&props(json!({}))), json!("a"));
        assert_eq!(e.eval(&props(json!({"score": 5000}))), json!("c"));
    }

    #[test]
    fn test_interpolate_clamps() {
        let e = Expr::Interpolate {
            curve: Curve::Linear,
            input: Box::new(number("d", 0.0)),
            stops: vec![(0.0, 0.3), (10.0, 0.9)],
        };
        assert_eq!(e.eval(&props(json!({"d": -5}))), json!(0.3));
        assert_eq!(e.eval(&props(json!({"d": 50}))), json!(0.9));
        let mid = e.eval(&props(json!({"d": 5}))).as_f64().unwrap();
        assert!((mid - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_null_comparisons_are_false() {
        let e = Expr::Compare(CmpOp::Le, Box::new(get("missing")), Box::new(lit(1.0)));
        assert_eq!(e.eval(&Map::new()), json!(false));
    }

    #[test]
    fn test_eq_on_stringified_ids() {
        let e = Expr::Compare(CmpOp::Eq, Box::new(Expr::ToStr(Box::new(get("id")))), Box::new(lit("42")));
        assert_eq!(e.eval(&props(json!({"id": 42}))), json!(true));
        assert_eq!(e.eval(&props(json!({"id": "42"}))), json!(true));
        assert_eq!(e.eval(&props(json!({"id": 43}))), json!(false));
    }
}
