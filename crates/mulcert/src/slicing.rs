//! Assignment of gates to slices
//!
//! Slice `i` collects the gates contributing to output `s_i`. Reduction
//! processes slices from the most significant one downwards, and within a
//! slice in list order, so the lists must be topologically sorted (parents
//! first) across and within slices.
//!
//! There are two strategies: following XOR chains from the outputs (which
//! works for multipliers with a clean final-stage adder), and the fallback
//! assigning each gate to the slice of the first output whose input cone
//! contains it, followed by local merging and promotion.

use std::collections::VecDeque;

use log::{debug, info};

use mulcert_aiger::Literal;

use crate::context::Context;
use crate::gate::{GateId, XorRole};
use crate::VerifyError;

impl Context<'_> {
    /// Initialize every slice with its output gate
    pub(crate) fn init_slices(&mut self) {
        for i in 0..self.nn {
            let s = self.output_gate(i);
            self.slices[i] = vec![s];
            self[s].slice = Some(i);
        }
    }

    /// Reset all slices to the output gates only
    ///
    /// Every other gate becomes unsliced.
    pub(crate) fn clean_slices(&mut self) {
        for slice in &mut self.slices {
            slice.truncate(1);
        }
        for k in 0..self.m - 1 {
            self.gates[k].slice = None;
        }
    }

    /// Insert `g` into slice `i` in front of `anchor` (at the end if `anchor`
    /// is `None` or not in the slice)
    fn insert_before(&mut self, i: usize, anchor: Option<GateId>, g: GateId) {
        let slice = &mut self.slices[i];
        match anchor.and_then(|a| slice.iter().position(|&x| x == a)) {
            Some(pos) => slice.insert(pos, g),
            None => slice.push(g),
        }
    }

    fn all_parents_sliced(&self, n: GateId) -> bool {
        self[n].parents.iter().all(|&p| self[p].is_sliced())
    }

    /// Whether every sliced parent of `n` is in slice `i` or above
    fn parents_in_equal_or_larger_slice(&self, n: GateId, i: usize) -> bool {
        self[n]
            .parents
            .iter()
            .all(|&p| self[p].slice.map_or(true, |s| s >= i))
    }

    fn children_in_larger_slices(&self, n: GateId, i: usize) -> bool {
        self[n]
            .children
            .iter()
            .any(|&c| self[c].slice > Some(i))
    }

    // --- XOR based slicing ------------------------------------------------

    fn is_valid_available_xor(&self, g: GateId, i: usize) -> bool {
        let gate = &self[g];
        if gate.is_sliced() {
            return false;
        }
        let parent_below = gate.parents.iter().any(|&p| self[p].slice < Some(i));
        if i == self.nn - 1 && parent_below {
            return false;
        }
        if gate.pp {
            return !parent_below;
        }
        gate.xor == XorRole::Root
    }

    /// Assign the XORs (and partial products) below each output to its slice
    ///
    /// Gates that cannot be assigned remember the first slice they were
    /// reached from as their carry slice.
    fn slice_by_xor_chains(&mut self) {
        for i in 0..self.nn {
            let out = self.output_gate(i);
            self[out].slice = Some(i);
            let Some(&child) = self[out].children.first() else {
                continue;
            };
            if self[child].is_sliced() || self[child].is_input() {
                continue;
            }
            self[child].slice = Some(i);
            self.slices[i].push(child);

            let mut queue = VecDeque::new();
            if i != self.nn - 1 || self[child].xor == XorRole::Root {
                queue.push_back(child);
            }
            while let Some(n) = queue.pop_front() {
                for k in 0..self[n].children.len() {
                    let c = self[n].children[k];
                    if self.is_valid_available_xor(c, i) {
                        if !self[c].pp {
                            queue.push_back(c);
                        }
                        self[c].slice = Some(i);
                        self.slices[i].push(c);
                    } else if !self[c].is_input() && self[c].carry == 0 {
                        self[c].carry = i as i32;
                    }
                }
            }
        }
    }

    /// After inserting `n` into its slice, move its children that come too
    /// late in the same slice or sit in a larger slice in front of `anchor`
    fn move_inserted_children_from_larger_slices(&mut self, n: GateId, anchor: Option<GateId>) {
        let mut stack = vec![(n, 0)];
        while let Some((n, k)) = stack.pop() {
            let Some(&c) = self[n].children.get(k) else {
                continue;
            };
            stack.push((n, k + 1));
            if self[c].is_input() {
                continue;
            }
            let Some(i) = self[n].slice else { continue };
            match self[c].slice {
                Some(j) if j == i => {
                    let first = self.slices[i].iter().position(|&g| g == c || g == n);
                    if let Some(pos) = first.filter(|&pos| self.slices[i][pos] == c) {
                        self.slices[i].remove(pos);
                        self.insert_before(i, anchor, c);
                        stack.push((c, 0));
                    }
                }
                Some(j) if j > i => {
                    self.insert_before(i, anchor, c);
                    self.slices[j].retain(|&g| g != c);
                    self[c].slice = Some(i);
                    stack.push((c, 0));
                }
                _ => {}
            }
        }
    }

    /// Pull the parents of `n` into the slice of `pre`
    ///
    /// Parents are inserted behind their own sliced parents and in front of
    /// their children. Returns `true` if no consistent position exists.
    fn upwards_slicing(&mut self, n: GateId, pre: GateId) -> bool {
        if !self[n].is_sliced() && self[pre].aig_output {
            return false;
        }
        let mut stack = vec![(n, pre, 0)];
        while let Some((n, pre, k)) = stack.pop() {
            let Some(&p) = self[n].parents.get(k) else {
                continue;
            };
            stack.push((n, pre, k + 1));

            if self[p].eliminated || self[p].is_sliced() || self[p].is_output() {
                continue;
            }
            let Some(s) = self[pre].slice else { continue };
            if !self.parents_in_equal_or_larger_slice(p, s) {
                continue;
            }
            if self.children_in_larger_slices(p, 0) && (s == 0 || self[p].carry - 1 > s as i32) {
                continue;
            }
            self[p].slice = Some(s);

            if !self.is_child(pre, p) {
                let mut grandparents: Vec<GateId> = self.slices[s]
                    .iter()
                    .copied()
                    .filter(|&g| self.is_parent(p, g))
                    .collect();
                let mut pos = 0;
                while pos < self.slices[s].len() {
                    let cmp = self.slices[s][pos];
                    let is_child = self.is_child(p, cmp);
                    let is_parent = self.is_parent(p, cmp);
                    if is_child && !grandparents.is_empty() {
                        if grandparents.len() > 1 {
                            return true;
                        }
                        // the last parent of `p` comes after a child of `p`:
                        // move it in front
                        let gp = grandparents[0];
                        self.slices[s].retain(|&g| g != gp);
                        self.slices[s].insert(pos, p);
                        self.slices[s].insert(pos, gp);
                        self.move_inserted_children_from_larger_slices(p, Some(cmp));
                        break;
                    } else if (cmp == pre || is_child) && grandparents.is_empty() {
                        self.slices[s].insert(pos, p);
                        self.move_inserted_children_from_larger_slices(p, Some(cmp));
                        break;
                    } else if is_parent && grandparents.len() > 1 {
                        grandparents.retain(|&g| g != cmp);
                    } else if is_parent && grandparents.len() == 1 {
                        self.slices[s].insert(pos + 1, p);
                        let anchor = self.slices[s].get(pos + 2).copied();
                        self.move_inserted_children_from_larger_slices(p, anchor);
                        break;
                    }
                    pos += 1;
                }
            } else if let Some(pos) = self.slices[s].iter().position(|&g| g == pre) {
                self.slices[s].insert(pos + 1, p);
            }

            if self[p].carry == 0 || !self.all_parents_sliced(p) {
                stack.push((p, p, 0));
            }
        }
        false
    }

    /// Pull gates sticking out of the XOR slices into the slices above
    ///
    /// Returns `true` on failure.
    fn slice_jut_gates(&mut self) -> bool {
        for i in (0..self.nn).rev() {
            let out = self.output_gate(i);
            self[out].slice = Some(i);
            let Some(&child) = self[out].children.first() else {
                continue;
            };
            let mut queue = VecDeque::new();
            if self[child].xor == XorRole::Root || i != self.nn - 1 {
                queue.push_back(child);
            }
            if self[child].parents.len() > 1 {
                self.upwards_slicing(child, child);
            }

            while let Some(n) = queue.pop_front() {
                for k in 0..self[n].children.len() {
                    let c = self[n].children[k];
                    if self[c].slice == Some(i) {
                        queue.push_back(c);
                    }
                    if self[c].xor == XorRole::Root || self[c].pp {
                        if self[c].slice == Some(i) && self.upwards_slicing(c, c) {
                            return true;
                        }
                    } else if self[c].carry == i as i32 && !self[c].is_input() {
                        let gate_children = match (self[c].children.first(), self[c].children.last())
                        {
                            (Some(&f), Some(&l)) => !self[f].is_input() && !self[l].is_input(),
                            _ => false,
                        };
                        if gate_children && self.upwards_slicing(c, n) {
                            return true;
                        }
                    }
                }
            }
        }
        false
    }

    /// The first child of `n` in the slice list, if all children of `n` are
    /// AND gates in the same slice
    fn topological_largest_child(&self, n: GateId) -> Result<Option<GateId>, VerifyError> {
        let children = &self[n].children;
        let Some(&first) = children.first() else {
            return Ok(None);
        };
        let slice = self[first].slice;
        for &c in children {
            if self[c].is_input() {
                return Ok(None);
            }
            if self[c].slice != slice {
                return Err(VerifyError::InconsistentChildSlices {
                    gate: self[n].name().to_string(),
                    child: self[c].name().to_string(),
                });
            }
        }
        let Some(s) = slice else { return Ok(None) };
        Ok(self.slices[s].iter().copied().find(|g| children.contains(g)))
    }

    /// Move `n` to slice `i`, right in front of its first child
    fn fix_slice(&mut self, n: GateId, i: usize) -> Result<(), VerifyError> {
        let Some(after) = self.topological_largest_child(n)? else {
            return Ok(());
        };
        if let Some(s) = self[n].slice {
            self.slices[s].retain(|&g| g != n);
        }
        if self[n].eliminated {
            return Ok(());
        }
        self[n].slice = Some(i);
        self.insert_before(i, Some(after), n);
        Ok(())
    }

    /// Move XORs whose operands both live in the slice below into that slice
    fn fix_xors(&mut self) -> Result<usize, VerifyError> {
        let mut count = 0;
        for n in self.internal_gates() {
            let gate = &self[n];
            if gate.eliminated || gate.xor != XorRole::Root || gate.aig_output {
                continue;
            }
            let Some(g) = gate.and() else { continue };
            let (Some(l), Some(r)) = (self.gate_of(g.rhs0), self.gate_of(g.rhs1)) else {
                continue;
            };
            let Some(land) = self.first_fan_in_and(n) else {
                continue;
            };
            let (Some(mut ll), Some(mut lr)) = (self.gate_of(land.rhs0), self.gate_of(land.rhs1))
            else {
                continue;
            };
            if self[ll].pp || self[lr].pp {
                continue;
            }
            if self[ll].slice < self[lr].slice {
                std::mem::swap(&mut ll, &mut lr);
            }

            let below = self[n].slice.and_then(|s| s.checked_sub(1));
            let fits = self[ll].slice == below && self[lr].slice == below;
            let (pl, pr) = (self[ll].parents.len(), self[lr].parents.len());
            let moved_before = self[ll].moved || self[lr].moved;
            let mark = if pl + pr <= 3 {
                true
            } else if pl == 2 && pr == 2 && moved_before {
                false
            } else {
                continue;
            };
            let Some(target) = below.filter(|_| fits) else {
                continue;
            };

            if !self[r].eliminated {
                self.fix_slice(r, target)?;
            }
            if !self[l].eliminated {
                self.fix_slice(l, target)?;
            }
            self.fix_slice(n, target)?;
            count += 1;
            if mark {
                self[n].moved = true;
            }
        }
        debug!("moved {count} XOR gates");
        Ok(count)
    }

    /// Move gates with many children into the slice of their children
    fn fix_jut_gates(&mut self) -> Result<(), VerifyError> {
        for n in self.internal_gates() {
            let gate = &self[n];
            if gate.xor != XorRole::Plain || gate.eliminated || gate.pp || gate.children.len() < 4
            {
                continue;
            }
            let Some(below) = gate.slice.and_then(|s| s.checked_sub(1)) else {
                continue;
            };
            let all_below = gate
                .children
                .iter()
                .all(|&c| self[c].is_input() || self[c].slice == Some(below));
            if all_below {
                self.fix_slice(n, below)?;
            }
        }
        Ok(())
    }

    /// Whether reducing the slices from the most significant one downwards
    /// substitutes every gate before its children
    ///
    /// Unsliced gates are looked through, they get eliminated into their
    /// parents before reduction. A gate with a slice that is missing from
    /// the slice lists is never substituted, which also counts as a
    /// violation.
    pub(crate) fn slices_are_topological(&self) -> bool {
        const UNLISTED: usize = usize::MAX;
        let mut order = vec![UNLISTED; self.num_gates()];
        let listed = self.slices.iter().rev().flatten();
        for (k, &g) in listed.filter(|&&g| !self[g].eliminated).enumerate() {
            order[g.0] = k;
        }

        let mut visited = vec![UNLISTED; self.num_gates()];
        let mut stack = Vec::new();
        for (i, gate) in self.gates.iter().enumerate() {
            if order[i] == UNLISTED {
                continue;
            }
            stack.clear();
            stack.extend_from_slice(&gate.children);
            while let Some(c) = stack.pop() {
                if visited[c.0] == i {
                    continue;
                }
                visited[c.0] = i;
                let child = &self[c];
                if child.is_input() || child.eliminated {
                    continue;
                }
                if order[c.0] != UNLISTED {
                    if order[c.0] < order[i] {
                        debug!("{} is reduced before its parent {}", child.name(), gate.name());
                        return false;
                    }
                } else if child.is_sliced() {
                    debug!("{} has a slice but is not listed in it", child.name());
                    return false;
                } else {
                    stack.extend_from_slice(&child.children);
                }
            }
        }
        true
    }

    /// XOR based slicing, returns `true` on failure
    pub(crate) fn slicing_xor(&mut self) -> Result<bool, VerifyError> {
        self.slice_by_xor_chains();
        if self.slice_jut_gates() {
            info!("XOR based slicing failed");
            return Ok(true);
        }
        if self.fix_xors()? > 0 {
            self.fix_jut_gates()?;
        }
        if !self.slices_are_topological() {
            info!("XOR based slicing produced no topological order");
            return Ok(true);
        }
        Ok(false)
    }

    // --- Input cone slicing -----------------------------------------------

    /// Assign all unsliced AND gates in the input cone of `root` to slice `i`
    fn input_cone(&mut self, root: GateId, i: usize) {
        let mut stack = vec![root];
        while let Some(n) = stack.pop() {
            if self[n].is_input() || self[n].is_sliced() {
                continue;
            }
            self[n].slice = Some(i);
            stack.extend(self[n].children.iter().rev());
        }
    }

    fn find_carries(&mut self) {
        for n in self.internal_gates() {
            if self[n].eliminated {
                continue;
            }
            self[n].carry = self.parents_above(n);
        }
    }

    /// Move gates one slice down as long as none of their children is in
    /// the same slice
    fn merge_all(&mut self) -> usize {
        let mut count = 0;
        loop {
            let mut changed = false;
            for n in self.internal_gates().rev() {
                let gate = &self[n];
                let Some(s) = gate.slice.filter(|&s| s >= 1) else {
                    continue;
                };
                if gate.eliminated || gate.is_input() {
                    continue;
                }
                if gate.xor == XorRole::Inner {
                    let Some(g) = gate.and() else { continue };
                    let (Some(v0), Some(v1)) = (self.gate_of(g.rhs0), self.gate_of(g.rhs1)) else {
                        continue;
                    };
                    let (v0, v1) = (&self[v0], &self[v1]);
                    if v0.slice != v1.slice || v1.slice >= Some(s) || v0.pp || v1.pp {
                        continue;
                    }
                }
                if gate.xor == XorRole::Root && (!gate.aig_output || gate.parents.len() > 1) {
                    continue;
                }
                let blocked = gate.children.iter().any(|&c| {
                    let c = &self[c];
                    c.is_input() || c.slice == Some(s) || c.booth
                });
                if blocked {
                    continue;
                }

                self[n].slice = Some(s - 1);
                self[n].carry = self.parents_above(n);
                for k in 0..self[n].children.len() {
                    let c = self[n].children[k];
                    if self[c].slice == Some(s - 1) {
                        self[c].carry -= 1;
                    }
                }
                changed = true;
                count += 1;
            }
            if !changed {
                break;
            }
        }
        count
    }

    /// Move gates one slice up if all their parents are in larger slices
    fn promote_all(&mut self) -> usize {
        let mut count = 0;
        loop {
            let mut changed = false;
            for n in self.internal_gates() {
                let gate = &self[n];
                if gate.carry == 0 || gate.pp || gate.parents.len() as i32 != gate.carry {
                    continue;
                }
                let Some(g) = gate.and() else { continue };
                let (Some(v0), Some(v1)) = (self.gate_of(g.rhs0), self.gate_of(g.rhs1)) else {
                    continue;
                };
                if gate.xor != XorRole::Inner {
                    let (g0, g1) = (&self[v0], &self[v1]);
                    let (c0, c1) = (g0.carry != 0, g1.carry != 0);
                    if !((c0 && c1) || (c0 && g1.is_input()) || (c1 && g0.is_input())) {
                        continue;
                    }
                }
                if gate.parents.iter().any(|&p| self[p].slice == gate.slice) {
                    continue;
                }

                let slice = self[n].slice.map_or(0, |s| s + 1);
                self[n].slice = Some(slice);
                self[v0].carry += 1;
                self[v1].carry += 1;
                self[n].carry = self.parents_above(n);
                changed = true;
                count += 1;
            }
            if !changed {
                break;
            }
        }
        count
    }

    fn fill_slices(&mut self) {
        for i in 0..self.nn {
            for n in self.internal_gates().rev() {
                if self[n].slice == Some(i) {
                    self.slices[i].push(n);
                }
            }
        }
    }

    /// Slicing based on input cones of the outputs
    pub(crate) fn slicing_non_xor(&mut self) {
        for i in 0..self.nn {
            let s = self.output_gate(i);
            if let Some(&c) = self[s].children.first() {
                self.input_cone(c, i);
            }
        }
        self.find_carries();
        let merged = self.merge_all();
        let promoted = self.promote_all();
        debug!("merged {merged} and promoted {promoted} gates");
        self.fill_slices();
    }

    /// Mark the gates of Booth-encoded partial products
    ///
    /// Returns `true` if any were found.
    pub(crate) fn search_for_booth_pattern(&mut self) -> bool {
        let mut found = false;
        let both_inputs = |ctx: &Self, a: Literal, b: Literal| {
            matches!(
                (ctx.gate_of(a), ctx.gate_of(b)),
                (Some(x), Some(y)) if ctx[x].is_input() && ctx[y].is_input()
            )
        };

        for n in self.internal_gates() {
            if self[n].eliminated {
                continue;
            }
            let Some(and1) = self[n].and() else { continue };

            if self[n].slice == Some(1) {
                if !self[n].pp {
                    continue;
                }
                let (l, r) = (and1.rhs0.positive(), and1.rhs1.positive());
                if l.code().wrapping_sub(r.code()) == 2 {
                    self[n].booth = true;
                    found = true;
                }
                continue;
            }

            if self[n].pp || self[n].xor != XorRole::Root || self[n].parents.len() != 1 {
                continue;
            }
            if !and1.rhs0.is_negated() {
                continue;
            }
            let Some(land1) = self.first_fan_in_and(n) else {
                continue;
            };
            if !both_inputs(self, land1.rhs0, land1.rhs1) {
                continue;
            }
            let xor1 = n;
            let vp = self[n].parents[0];
            let Some(pand) = self[vp].and() else { continue };
            let other = if self.gate_of(pand.rhs0) == Some(xor1) {
                pand.rhs1
            } else {
                pand.rhs0
            };
            let Some(xor2) = self.gate_of(other) else {
                continue;
            };
            let Some(and2) = self[xor2].and() else { continue };
            if self[xor2].parents.len() < self.nn / 2 + 1
                || self[xor2].slice >= self[xor1].slice
                || self[xor2].xor == XorRole::Plain
                || !and2.rhs0.is_negated()
            {
                continue;
            }
            let Some(land2) = self.first_fan_in_and(xor2) else {
                continue;
            };
            if !both_inputs(self, land2.rhs0, land2.rhs1) {
                continue;
            }
            let ops1 = [land1.rhs0.positive(), land1.rhs1.positive()];
            let ops2 = [land2.rhs0.positive(), land2.rhs1.positive()];
            if !ops1.iter().any(|o| ops2.contains(o)) {
                continue;
            }

            let marked = [
                Some(xor1),
                self.gate_of(and1.rhs0),
                self.gate_of(and1.rhs1),
                Some(xor2),
                self.gate_of(and2.rhs0),
                self.gate_of(and2.rhs1),
                Some(vp),
            ];
            for g in marked.into_iter().flatten() {
                self[g].booth = true;
            }
            found = true;
        }
        if found {
            info!("found Booth pattern");
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use mulcert_aiger::InputOrder;
    use mulcert_test_utils::fixtures::{parse, MULT2_AAG};
    use mulcert_test_utils::{array_multiplier, booth_multiplier, XorStyle};

    use super::*;

    /// Children never come before their parents in the reduction order
    fn assert_topological(ctx: &Context) {
        let mut pos = vec![None; ctx.num_gates()];
        let mut k = 0;
        for i in (0..ctx.nn).rev() {
            for &g in &ctx.slices[i] {
                if !ctx[g].eliminated {
                    pos[g.0] = Some(k);
                    k += 1;
                }
            }
        }
        for (i, gate) in ctx.gates.iter().enumerate() {
            let Some(pi) = pos[i] else { continue };
            for &c in &gate.children {
                if let Some(pc) = pos[c.0] {
                    assert!(pi < pc, "{} is reduced after its child {}", gate.name(), ctx[c].name());
                }
            }
        }
    }

    #[test]
    fn xor_slicing_of_2_bit_multiplier() {
        let aig = parse(MULT2_AAG.as_bytes());
        let mut ctx = Context::new(&aig, false).unwrap();
        ctx.init_slices();
        ctx.mark_xor_chain_in_last_slice();
        ctx.remove_internal_xor_gates().unwrap();
        assert!(ctx.upper_half_xor_output());
        ctx.remove_single_occs_gates().unwrap();
        assert!(!ctx.slicing_xor().unwrap());
        ctx.remove_slice_minus_one_gates().unwrap();

        // each slice holds its output and the gate driving it, the partial
        // products and the carry l16 got substituted
        for (i, driver) in [4, 9, 13, 11].into_iter().enumerate() {
            assert_eq!(ctx.slices[i], [ctx.output_gate(i), GateId(driver)]);
        }
        for n in [5, 6, 7, 10] {
            assert!(ctx[GateId(n)].eliminated);
        }
        assert_eq!(ctx[GateId(11)].children, [GateId(1), GateId(2), GateId(0), GateId(3)]);
        assert_topological(&ctx);
    }

    #[test]
    fn xor_slicing_of_generated_multipliers() {
        for n in 3..=4 {
            for signed in [false, true] {
                for order in [InputOrder::Abc, InputOrder::Btor] {
                    let aig = array_multiplier(n, signed, XorStyle::Complementary, order);
                    let mut ctx = Context::new(&aig, signed).unwrap();
                    ctx.init_slices();
                    ctx.mark_xor_chain_in_last_slice();
                    ctx.remove_internal_xor_gates().unwrap();
                    assert!(ctx.upper_half_xor_output());
                    ctx.remove_single_occs_gates().unwrap();
                    assert!(
                        !ctx.slicing_xor().unwrap(),
                        "{n} bit multiplier (signed: {signed}, {order:?})"
                    );
                    assert_topological(&ctx);

                    ctx.remove_slice_minus_one_gates().unwrap();
                    assert_topological(&ctx);
                    for g in ctx.internal_gates() {
                        assert!(ctx[g].eliminated || ctx.slices.iter().any(|s| s.contains(&g)));
                    }
                }
            }
        }
    }

    #[test]
    fn slice_order_violations() {
        let aig = parse(MULT2_AAG.as_bytes());
        let mut ctx = Context::new(&aig, false).unwrap();
        ctx.init_slices();
        ctx.mark_xor_chain_in_last_slice();
        ctx.remove_internal_xor_gates().unwrap();
        ctx.remove_single_occs_gates().unwrap();
        assert!(!ctx.slicing_xor().unwrap());
        assert!(ctx.slices_are_topological());

        let (l14, l22, l24) = (GateId(6), GateId(10), GateId(11));
        let s3 = ctx.output_gate(3);

        // output behind its driver
        ctx.slices[3] = vec![l24, s3];
        assert!(!ctx.slices_are_topological());
        ctx.slices[3] = vec![s3, l24];

        // l28 reaches l14 through the unsliced l16
        ctx[l14].slice = Some(3);
        ctx.slices[3].push(l14);
        assert!(!ctx.slices_are_topological());
        ctx.slices[3].pop();
        ctx[l14].slice = None;
        assert!(ctx.slices_are_topological());

        // sliced, but never reduced
        ctx[l22].slice = Some(3);
        assert!(!ctx.slices_are_topological());
    }

    #[test]
    fn booth_encoder_detection() {
        for signed in [false, true] {
            let aig = booth_multiplier(4, signed, XorStyle::SharedNand);
            let mut ctx = Context::new(&aig, signed).unwrap();
            assert!(ctx.booth);
            ctx.init_slices();
            ctx.slicing_non_xor();
            assert!(ctx.search_for_booth_pattern());

            // the recoding of b3 b2 b1 (both XORs with their inner gates and
            // their conjunction) and the partial product b1 b0 in slice 1
            let marked: Vec<GateId> = ctx.internal_gates().filter(|&g| ctx[g].booth).collect();
            assert_eq!(marked.len(), 8);
            for &g in &marked {
                for &c in &ctx[g].children {
                    assert!(
                        ctx.b.contains(&c) || ctx[c].booth,
                        "{} uses {}",
                        ctx[g].name(),
                        ctx[c].name()
                    );
                }
            }

            assert_eq!(ctx.eliminate_booth_pattern().unwrap(), 8);
            assert!(marked.iter().all(|&g| ctx[g].eliminated));
            for g in ctx.internal_gates().filter(|&g| !ctx[g].eliminated) {
                assert!(ctx[g].children.iter().all(|c| !marked.contains(c)));
            }
        }
    }

    #[test]
    fn input_cone_slicing() {
        for n in 2..=4 {
            let aig = array_multiplier(n, false, XorStyle::SharedNand, InputOrder::Abc);
            let mut ctx = Context::new(&aig, false).unwrap();
            ctx.init_slices();
            ctx.slicing_non_xor();
            for g in ctx.internal_gates() {
                assert!(ctx[g].is_sliced(), "{} has no slice", ctx[g].name());
                for &c in &ctx[g].children {
                    assert!(ctx[c].is_input() || ctx[c].slice <= ctx[g].slice);
                }
            }
            assert_topological(&ctx);
        }
    }

    #[test]
    fn inconsistent_child_slices() {
        let aig = parse(MULT2_AAG.as_bytes());
        let mut ctx = Context::new(&aig, false).unwrap();
        let (l16, l12, l14) = (GateId(7), GateId(5), GateId(6));
        ctx[l12].slice = Some(1);
        ctx[l14].slice = Some(2);
        let err = ctx.topological_largest_child(l16).unwrap_err();
        assert!(matches!(err, VerifyError::InconsistentChildSlices { .. }));
        assert_eq!(
            err.to_string(),
            "children of l16 are in different slices (first mismatch: l14)"
        );

        ctx[l14].slice = Some(1);
        ctx.slices[1] = vec![ctx.output_gate(1), l14, l12];
        assert_eq!(ctx.topological_largest_child(l16).unwrap(), Some(l14));
        ctx.fix_slice(l16, 1).unwrap();
        assert_eq!(ctx.slices[1], [ctx.output_gate(1), l16, l14, l12]);
    }
}
