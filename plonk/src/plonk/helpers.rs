use crate::{
    errors::{PlonkError, Result},
    plonk::{
        constants::NUM_WIRES,
        domain::{CosetEvals, PlonkDomain, WireColumns},
        gate::GateKind,
        indexer::{PlonkEvals, ProvingKey, VerificationKey},
    },
    poly_commit::{
        field_polynomial::FpPolynomial,
        pcs::{HomomorphicPolyComElem, PolyComScheme},
    },
};
use ark_poly::EvaluationDomain;
use ark_std::{cfg_into_iter, cfg_iter};
use kite_algebra::prelude::*;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The Fiat-Shamir challenges of one proof, filled in the order they are drawn:
/// `beta, gamma`, then `alpha`, `xi`, `v` and `u`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlonkChallenges<F> {
    challenges: Vec<F>,
}

impl<F: Scalar> PlonkChallenges<F> {
    /// An empty set of challenges.
    pub fn new() -> PlonkChallenges<F> {
        PlonkChallenges {
            challenges: Vec::with_capacity(6),
        }
    }

    fn insert_at(&mut self, position: usize, challenge: F) -> Result<()> {
        if self.challenges.len() == position {
            self.challenges.push(challenge);
            Ok(())
        } else {
            Err(PlonkError::ChallengeError)
        }
    }

    fn get_at(&self, position: usize) -> Result<&F> {
        self.challenges
            .get(position)
            .ok_or(PlonkError::ChallengeError)
    }

    /// Insert beta and gamma.
    pub fn insert_beta_gamma(&mut self, beta: F, gamma: F) -> Result<()> {
        self.insert_at(0, beta)?;
        self.insert_at(1, gamma)
    }

    /// Insert alpha.
    pub fn insert_alpha(&mut self, alpha: F) -> Result<()> {
        self.insert_at(2, alpha)
    }

    /// Insert xi.
    pub fn insert_xi(&mut self, xi: F) -> Result<()> {
        self.insert_at(3, xi)
    }

    /// Insert v.
    pub fn insert_v(&mut self, v: F) -> Result<()> {
        self.insert_at(4, v)
    }

    /// Insert u.
    pub fn insert_u(&mut self, u: F) -> Result<()> {
        self.insert_at(5, u)
    }

    /// Return beta and gamma.
    pub fn get_beta_gamma(&self) -> Result<(&F, &F)> {
        Ok((self.get_at(0)?, self.get_at(1)?))
    }

    /// Return alpha.
    pub fn get_alpha(&self) -> Result<&F> {
        self.get_at(2)
    }

    /// Return xi.
    pub fn get_xi(&self) -> Result<&F> {
        self.get_at(3)
    }

    /// Return v.
    pub fn get_v(&self) -> Result<&F> {
        self.get_at(4)
    }

    /// Return u.
    pub fn get_u(&self) -> Result<&F> {
        self.get_at(5)
    }
}

/// Add `sum_i blinds[i] * X^i * (X^n - 1)`, which vanishes on the domain of size `n`.
pub(super) fn hide_polynomial<F: Scalar>(
    polynomial: &mut FpPolynomial<F>,
    blinds: &[F],
    n: usize,
) {
    for (i, blind) in blinds.iter().enumerate() {
        polynomial.add_coef_assign(blind, n + i);
        polynomial.add_coef_assign(&blind.neg(), i);
    }
}

/// `prod_col (w_col + beta * x_col + gamma)`.
fn permutation_factor<F: Scalar>(
    wires: &[F; NUM_WIRES],
    ids: &[F; NUM_WIRES],
    beta: &F,
    gamma: &F,
) -> F {
    wires.iter().zip(ids.iter()).fold(F::one(), |acc, (w, id)| {
        acc.mul(&w.add(&beta.mul(id)).add(gamma))
    })
}

/// The grand product `Z` on the domain: `Z(w^0) = 1` and
/// `Z(w^{i+1}) = Z(w^i) * prod (w + beta * k * w^i + gamma) / prod (w + beta * sigma + gamma)`.
///
/// The product must close, i.e. come back to one after the last row, or the witness
/// breaks a copy constraint.
pub(super) fn compute_z_evals<PCS: PolyComScheme>(
    pk: &ProvingKey<PCS>,
    wires: &WireColumns<PCS::Field>,
    beta: &PCS::Field,
    gamma: &PCS::Field,
) -> Result<Vec<PCS::Field>> {
    let domain = pk.domain();
    let n = domain.size();
    let k = *domain.k();
    let elements = domain.elements();

    let ratios = cfg_into_iter!(0..n)
        .map(|row| {
            let w = core::array::from_fn(|col| *wires.get(col, row));
            let ids = core::array::from_fn(|col| k[col].mul(&elements[row]));
            let sigmas = core::array::from_fn(|col| *pk.sigma_evals.get(col, row));
            let numerator = permutation_factor(&w, &ids, beta, gamma);
            let denominator = permutation_factor(&w, &sigmas, beta, gamma);
            let denominator_inv = denominator
                .inv()
                .map_err(|_| PlonkError::DivisionByZero)?;
            Ok(numerator.mul(&denominator_inv))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut z_evals = Vec::with_capacity(n);
    let mut acc = PCS::Field::one();
    for ratio in ratios.iter() {
        z_evals.push(acc);
        acc.mul_assign(ratio);
    }
    if acc != PCS::Field::one() {
        return Err(PlonkError::CopyConstraintViolation);
    }
    Ok(z_evals)
}

/// The public input polynomial, `-pub_i` on row `i` and zero elsewhere.
pub(super) fn pi_poly<PCS: PolyComScheme>(
    pk: &ProvingKey<PCS>,
    public_inputs: &[PCS::Field],
) -> Result<FpPolynomial<PCS::Field>> {
    let domain = pk.domain();
    let evals: Vec<PCS::Field> = public_inputs.iter().map(|x| x.neg()).collect();
    Ok(FpPolynomial::ifft_with_domain(&domain.radix2()?, &evals))
}

/// Evaluate the public input polynomial at `xi` from the Lagrange basis,
/// without interpolating it.
pub(super) fn eval_pi_poly<PCS: PolyComScheme>(
    vk: &VerificationKey<PCS>,
    public_inputs: &[PCS::Field],
    xi: &PCS::Field,
) -> Result<PCS::Field> {
    let mut eval = PCS::Field::zero();
    let mut omega_i = PCS::Field::one();
    for x in public_inputs.iter() {
        let l_i = vk.domain.lagrange_eval(&omega_i, xi)?;
        eval.sub_assign(&x.mul(&l_i));
        omega_i.mul_assign(vk.domain.omega());
    }
    Ok(eval)
}

/// The quotient `t = (gate + alpha * perm + alpha^2 * (Z - 1) * L1) / Z_H`, computed
/// pointwise on the quotient coset where `Z_H` does not vanish.
///
/// `t` has degree at most `3n + 5` when the witness is valid, anything higher means the
/// numerator is not divisible by `Z_H`.
pub(super) fn t_poly<PCS: PolyComScheme>(
    pk: &ProvingKey<PCS>,
    challenges: &PlonkChallenges<PCS::Field>,
    wire_polys: &[FpPolynomial<PCS::Field>],
    z_poly: &FpPolynomial<PCS::Field>,
    pi_poly: &FpPolynomial<PCS::Field>,
) -> Result<FpPolynomial<PCS::Field>> {
    let domain = pk.domain();
    let n = domain.size();
    let extended = domain.extended()?;
    let g = domain.quotient_coset();
    let k = *domain.k();

    let (beta, gamma) = challenges.get_beta_gamma()?;
    let alpha = challenges.get_alpha()?;
    let alpha_sq = alpha.square();

    let on_coset = |p: &FpPolynomial<PCS::Field>| {
        CosetEvals::new(p.coset_fft_with_domain(&extended, &g), n)
    };
    let w_evals = wire_polys
        .iter()
        .map(&on_coset)
        .collect::<Result<Vec<_>>>()?;
    if w_evals.len() != NUM_WIRES {
        return Err(PlonkError::FuncParamsError);
    }
    let z_evals = on_coset(z_poly)?;
    let pi_evals = on_coset(pi_poly)?;

    let t_evals = cfg_into_iter!(0..extended.size())
        .map(|i| {
            let w: [PCS::Field; NUM_WIRES] = core::array::from_fn(|col| *w_evals[col].at(i));
            let x = pk.coset_points.at(i);
            let ids = core::array::from_fn(|col| k[col].mul(x));
            let sigmas = core::array::from_fn(|col| *pk.s_coset_evals[col].at(i));
            let z = z_evals.at(i);

            let q: Vec<PCS::Field> = pk.q_coset_evals.iter().map(|q| *q.at(i)).collect();
            let gate = GateKind::Arithmetic
                .prove_extra(&q, &w[0], &w[1], &w[2])
                .add(pi_evals.at(i));

            let perm = permutation_factor(&w, &ids, beta, gamma)
                .mul(z)
                .sub(&permutation_factor(&w, &sigmas, beta, gamma).mul(z_evals.next_row(i)));

            let boundary = z.sub(&PCS::Field::one()).mul(pk.l1_coset_evals.at(i));

            gate.add(&alpha.mul(&perm))
                .add(&alpha_sq.mul(&boundary))
                .mul(pk.z_h_inv_coset_evals.at(i))
        })
        .collect::<Vec<PCS::Field>>();

    let g_inv = g.inv()?;
    let t = FpPolynomial::coset_ifft_with_domain(&extended, &t_evals, &g_inv);
    if t.degree() > 3 * n + 5 {
        return Err(PlonkError::TDivisibilityError);
    }
    Ok(t)
}

/// Split `t` into `T1 + X^n * T2 + X^2n * T3`, each of degree at most `n + 5`, with the
/// split blinded by `b10` and `b11`, and commit to the pieces.
pub(super) fn split_t_and_commit<PCS: PolyComScheme>(
    pcs: &PCS,
    t: &FpPolynomial<PCS::Field>,
    n: usize,
    b10: &PCS::Field,
    b11: &PCS::Field,
) -> Result<(Vec<PCS::Commitment>, Vec<FpPolynomial<PCS::Field>>)> {
    let coefs = t.get_coefs_ref();
    let piece = |start: usize, end: usize| -> Vec<PCS::Field> {
        if start >= coefs.len() {
            vec![PCS::Field::zero()]
        } else {
            coefs[start..end.min(coefs.len())].to_vec()
        }
    };

    let mut t1 = FpPolynomial::from_coefs(piece(0, n));
    t1.add_coef_assign(b10, n);

    let mut t2 = FpPolynomial::from_coefs(piece(n, 2 * n));
    t2.add_coef_assign(&b10.neg(), 0);
    t2.add_coef_assign(b11, n);

    let mut t3 = FpPolynomial::from_coefs(piece(2 * n, coefs.len()));
    t3.add_coef_assign(&b11.neg(), 0);

    let t_polys = vec![t1, t2, t3];
    let cm_t_vec = cfg_iter!(t_polys)
        .map(|t| pcs.commit(t))
        .collect::<core::result::Result<Vec<_>, _>>()?;
    Ok((cm_t_vec, t_polys))
}

/// The linearization, either as a polynomial or as a commitment:
/// `gate(Q; a, b, c) + (alpha * prod (e + beta * k * xi + gamma) + alpha^2 * L1(xi)) * Z
/// - alpha * beta * zw * (a + beta * s1 + gamma) * (b + beta * s2 + gamma) * S3`.
pub(super) fn r_poly_or_comm<F: Scalar, E: HomomorphicPolyComElem<Scalar = F>>(
    q: &[&E],
    s3: &E,
    z: &E,
    k: &[F; NUM_WIRES],
    evals: &PlonkEvals<F>,
    challenges: &PlonkChallenges<F>,
    l1_xi: &F,
) -> Result<E> {
    let (beta, gamma) = challenges.get_beta_gamma()?;
    let alpha = challenges.get_alpha()?;
    let xi = challenges.get_xi()?;

    let mut r = GateKind::Arithmetic.verify_extra(q, &evals.a, &evals.b, &evals.c)?;

    let wires = [evals.a, evals.b, evals.c];
    let ids = core::array::from_fn(|col| k[col].mul(xi));
    let z_scalar = alpha
        .mul(&permutation_factor(&wires, &ids, beta, gamma))
        .add(&alpha.square().mul(l1_xi));
    r.add_assign(&z.mul(&z_scalar));

    let s3_scalar = alpha
        .mul(beta)
        .mul(&evals.zw)
        .mul(&evals.a.add(&beta.mul(&evals.s1)).add(gamma))
        .mul(&evals.b.add(&beta.mul(&evals.s2)).add(gamma));
    r.sub_assign(&s3.mul(&s3_scalar));
    Ok(r)
}

/// The linearization polynomial, on the prover side.
pub(super) fn r_poly<PCS: PolyComScheme>(
    pk: &ProvingKey<PCS>,
    z_poly: &FpPolynomial<PCS::Field>,
    evals: &PlonkEvals<PCS::Field>,
    challenges: &PlonkChallenges<PCS::Field>,
) -> Result<FpPolynomial<PCS::Field>> {
    let domain = pk.domain();
    let l1_xi = domain.first_lagrange_eval(challenges.get_xi()?)?;
    let q: Vec<&FpPolynomial<PCS::Field>> = pk.q_polys.iter().collect();
    let s3 = pk
        .s_polys
        .get(NUM_WIRES - 1)
        .ok_or(PlonkError::FuncParamsError)?;
    r_poly_or_comm(&q, s3, z_poly, domain.k(), evals, challenges, &l1_xi)
}

/// The commitment to the linearization polynomial, on the verifier side.
pub(super) fn r_commitment<PCS: PolyComScheme>(
    vk: &VerificationKey<PCS>,
    cm_z: &PCS::Commitment,
    evals: &PlonkEvals<PCS::Field>,
    challenges: &PlonkChallenges<PCS::Field>,
    l1_xi: &PCS::Field,
) -> Result<PCS::Commitment> {
    let q: Vec<&PCS::Commitment> = vk.cm_q_vec.iter().collect();
    let s3 = vk
        .cm_s_vec
        .get(NUM_WIRES - 1)
        .ok_or(PlonkError::FuncParamsError)?;
    r_poly_or_comm(&q, s3, cm_z, vk.domain.k(), evals, challenges, l1_xi)
}

/// The value of `t(xi)` implied by the openings:
/// `(r + PI(xi) - alpha * (a + beta * s1 + gamma) * (b + beta * s2 + gamma) * (c + gamma) * zw
/// - alpha^2 * L1(xi)) / Z_H(xi)`.
pub(super) fn t_eval_xi<F: Domain>(
    domain: &PlonkDomain<F>,
    evals: &PlonkEvals<F>,
    challenges: &PlonkChallenges<F>,
    pi_xi: &F,
    l1_xi: &F,
) -> Result<F> {
    let (beta, gamma) = challenges.get_beta_gamma()?;
    let alpha = challenges.get_alpha()?;
    let xi = challenges.get_xi()?;

    let perm = alpha
        .mul(&evals.a.add(&beta.mul(&evals.s1)).add(gamma))
        .mul(&evals.b.add(&beta.mul(&evals.s2)).add(gamma))
        .mul(&evals.c.add(gamma))
        .mul(&evals.zw);
    let numerator = evals
        .r
        .add(pi_xi)
        .sub(&perm)
        .sub(&alpha.square().mul(l1_xi));
    let z_h_inv = domain
        .vanishing_eval(xi)
        .inv()
        .map_err(|_| PlonkError::DivisionByZero)?;
    Ok(numerator.mul(&z_h_inv))
}

/// Commit to `(poly - claimed) / (X - point)`. The division must be exact, otherwise the
/// claimed value is not `poly(point)`.
pub(super) fn open_at<PCS: PolyComScheme>(
    pcs: &PCS,
    poly: &FpPolynomial<PCS::Field>,
    point: &PCS::Field,
    claimed: &PCS::Field,
) -> Result<PCS::Commitment> {
    let mut numerator = poly.clone();
    numerator.add_coef_assign(&claimed.neg(), 0);
    let (quotient, remainder) = numerator.div_by_linear(point);
    if !remainder.is_zero() {
        return Err(PlonkError::OpeningDivisionError);
    }
    Ok(pcs.commit(&quotient)?)
}
