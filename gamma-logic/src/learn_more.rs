//! Documentation links for the operations the input can call.

use serde::Serialize;

/// A titled link to documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Link {
    pub title: &'static str,
    pub url: &'static str,
}

const fn link(title: &'static str, url: &'static str) -> Link {
    Link { title, url }
}

/// A page of the SymPy documentation.
macro_rules! doc {
    ($path:literal) => {
        concat!("https://docs.sympy.org/latest", $path)
    };
}

const CALCULUS: &[(&str, &[Link])] = &[
    ("diff", &[link("Derivatives", doc!("/tutorials/intro-tutorial/calculus.html#derivatives"))]),
    ("integrate", &[link("Integrals", doc!("/tutorials/intro-tutorial/calculus.html#integrals"))]),
    ("series", &[link("Series Expansion", doc!("/tutorials/intro-tutorial/calculus.html#series-expansion"))]),
];

const ALGEBRA: &[(&str, &[Link])] = &[
    ("solve", &[link("Solvers", doc!("/modules/solvers/solvers.html"))]),
    (
        "factor",
        &[
            link("Factoring", doc!("/tutorials/intro-tutorial/simplification.html#factor")),
            link("Polynomial Manipulation", doc!("/modules/polys/reference.html")),
        ],
    ),
    ("expand", &[link("Expanding", doc!("/tutorials/intro-tutorial/simplification.html#expand"))]),
    ("simplify", &[link("Simplification", doc!("/tutorials/intro-tutorial/simplification.html"))]),
    ("subs", &[link("Substitution", doc!("/tutorials/intro-tutorial/basic_operations.html#substitution"))]),
];

const NUMBER_THEORY: &[(&str, &[Link])] = &[
    ("factorint", &[link("Integer Factorization", doc!("/modules/ntheory.html#sympy.ntheory.factor_.factorint"))]),
    ("isprime", &[link("Primality Testing", doc!("/modules/ntheory.html#sympy.ntheory.primetest.isprime"))]),
    ("gcd", &[link("Polynomial GCD", doc!("/modules/polys/reference.html#sympy.polys.polytools.gcd"))]),
    ("lcm", &[link("Polynomial LCM", doc!("/modules/polys/reference.html#sympy.polys.polytools.lcm"))]),
];

const PLOTTING: &[(&str, &[Link])] = &[("plot", &[link("Plotting", doc!("/modules/plotting.html"))])];

/// Returns the documentation links for the named operation, if there are any.
pub fn find(function: &str) -> Option<&'static [Link]> {
    [CALCULUS, ALGEBRA, NUMBER_THEORY, PLOTTING]
        .into_iter()
        .flatten()
        .find(|(name, _)| *name == function)
        .map(|(_, links)| *links)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn known_operations() {
        let links = find("factor").unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].title, "Factoring");
        assert!(find("diff").unwrap()[0].url.starts_with("https://docs.sympy.org/"));
    }

    #[test]
    fn unknown_operations() {
        assert_eq!(find("sin"), None);
        assert_eq!(find(""), None);
    }
}
