//! Math function implementations

/// SQRT(x)
pub fn fn_sqrt(args: &[f64]) -> f64 {
    args[0].sqrt()
}

/// LOG(x) natural logarithm, LOG(x, base) logarithm in `base`
pub fn fn_log(args: &[f64]) -> f64 {
    match args.get(1) {
        Some(base) => args[0].ln() / base.ln(),
        None => args[0].ln(),
    }
}

/// SIN(x), radians
pub fn fn_sin(args: &[f64]) -> f64 {
    args[0].sin()
}

/// COS(x), radians
pub fn fn_cos(args: &[f64]) -> f64 {
    args[0].cos()
}

/// TAN(x), radians
pub fn fn_tan(args: &[f64]) -> f64 {
    args[0].tan()
}

/// POW(x, y), equivalent to x^y
pub fn fn_pow(args: &[f64]) -> f64 {
    args[0].powf(args[1])
}

/// ABS(x)
pub fn fn_abs(args: &[f64]) -> f64 {
    args[0].abs()
}

/// FLOOR(x), towards negative infinity
pub fn fn_floor(args: &[f64]) -> f64 {
    args[0].floor()
}

/// CEIL(x), towards positive infinity
pub fn fn_ceil(args: &[f64]) -> f64 {
    args[0].ceil()
}
