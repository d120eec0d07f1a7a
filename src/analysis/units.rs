//! Unit parsing and canonical comparison for bindings.
use crate::error::UnitMismatchError;
use crate::store::Unit;
use std::collections::HashMap;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedUnit {
    terms: HashMap<String, i32>,
}

impl ParsedUnit {
    /// Parses `kg*m/s^2` style units. `**` is accepted as an exponent marker.
    pub fn from_str(s: &str) -> Result<Self, ()> {
        if s.trim().is_empty() { return Err(()); }

        let normalized = s.replace("**", "^");
        let mut terms = HashMap::new();
        let mut parts = normalized.split('/');

        if let Some(num) = parts.next() { Self::parse_product(num, 1, &mut terms)?; }
        if let Some(den) = parts.next() { Self::parse_product(den, -1, &mut terms)?; }
        if parts.next().is_some() { return Err(()); } // Multiple slashes

        Ok(Self { terms })
    }

    fn parse_product(s: &str, sign: i32, terms: &mut HashMap<String, i32>) -> Result<(), ()> {
        if s.trim() == "1" { return Ok(()); }
        if s.trim().is_empty() { return Err(()); }
        for factor in s.split('*') {
            let mut parts = factor.split('^');
            let base = parts.next().ok_or(())?.trim();
            if base.is_empty() || base.parse::<f64>().is_ok() { return Err(()); }
            let exp = parts.next().unwrap_or("1").trim().parse::<i32>().map_err(|_| ())?;
            if parts.next().is_some() { return Err(()); }
            *terms.entry(base.to_string()).or_insert(0) += exp * sign;
        }
        Ok(())
    }

    pub fn to_string(&self) -> String {
        let (num, den): (Vec<_>, Vec<_>) = self.terms.iter().filter(|&(_, &v)| v != 0).partition(|&(_, &v)| v > 0);

        let fmt = |terms: Vec<(&String, &i32)>| -> String {
            if terms.is_empty() { return "1".to_string(); }
            let mut t = terms; t.sort_by_key(|a| a.0);
            t.into_iter().map(|(k, v)| if v.abs() == 1 { k.clone() } else { format!("{}^{}", k, v.abs()) }).collect::<Vec<_>>().join("*")
        };

        let n_str = fmt(num);
        let d_str = fmt(den);

        if d_str == "1" {
            n_str
        } else {
            format!("{}/{}", n_str, d_str)
        }
    }
}

/// Canonical text of an optional unit; an absent unit is dimensionless ("1").
pub fn canonical(unit: Option<&Unit>) -> Result<String, ()> {
    match unit {
        None => Ok("1".to_string()),
        Some(u) => ParsedUnit::from_str(&u.0).map(|p| p.to_string()),
    }
}

/// Verifies a binding `from -> to` joins identical units after canonicalization.
pub fn check_binding(
    from: &str,
    from_unit: Option<&Unit>,
    to: &str,
    to_unit: Option<&Unit>,
) -> Result<(), UnitMismatchError> {
    let mismatch = || UnitMismatchError {
        from: from.to_string(),
        from_unit: from_unit.map_or("1".to_string(), |u| u.0.clone()),
        to: to.to_string(),
        to_unit: to_unit.map_or("1".to_string(), |u| u.0.clone()),
    };
    match (canonical(from_unit), canonical(to_unit)) {
        (Ok(a), Ok(b)) if a == b => Ok(()),
        _ => Err(mismatch()),
    }
}
