use crate::config::SelectionConfig;
use crate::models::OptimizedInvoice;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// 选择算法
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStrategy {
    /// 评分排序 + 容差贪心 (默认)
    #[default]
    Greedy,
    /// 按分量化的 0/1 子集和
    Exact,
}

impl SelectionStrategy {
    pub fn selector(self, params: SelectionConfig) -> Box<dyn InvoiceSelector + Send + Sync> {
        match self {
            SelectionStrategy::Greedy => Box::new(GreedySelector::new(params)),
            SelectionStrategy::Exact => Box::new(ExactSubsetSelector::new(params)),
        }
    }
}

/// 从候选发票中选出税额覆盖目标的子集
///
/// 实现必须只返回 `is_selectable()` 的发票。
pub trait InvoiceSelector {
    fn select(&self, candidates: &[OptimizedInvoice], target_amount: f64) -> Vec<OptimizedInvoice>;
}

/// 只保留有效且税额为正的发票
pub fn filter_valid_invoices(invoices: &[OptimizedInvoice]) -> Vec<&OptimizedInvoice> {
    invoices.iter().filter(|i| i.is_selectable()).collect()
}

/// 评分降序；评分差不超过 tie_threshold 视为并列，按税额降序
///
/// 该比较不满足传递性，标准库排序遇到不一致的比较可能 panic，这里用稳定归并排序。
pub fn sort_by_efficiency<'a>(
    invoices: &[&'a OptimizedInvoice],
    tie_threshold: f64,
) -> Vec<&'a OptimizedInvoice> {
    let compare = |a: &&OptimizedInvoice, b: &&OptimizedInvoice| {
        let diff = b.efficiency_score - a.efficiency_score;
        if diff.abs() > tie_threshold {
            return if diff > 0.0 { Ordering::Greater } else { Ordering::Less };
        }
        b.tax_amount
            .partial_cmp(&a.tax_amount)
            .unwrap_or(Ordering::Equal)
    };

    stable_merge_sort(invoices, &compare)
}

fn stable_merge_sort<T, F>(items: &[T], compare: &F) -> Vec<T>
where
    T: Copy,
    F: Fn(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items.to_vec();
    }

    let (left, right) = items.split_at(items.len() / 2);
    let left = stable_merge_sort(left, compare);
    let right = stable_merge_sort(right, compare);

    let mut merged = Vec::with_capacity(items.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        // 右侧严格更靠前才先取右侧，保证稳定
        if compare(&right[j], &left[i]) == Ordering::Less {
            merged.push(right[j]);
            j += 1;
        } else {
            merged.push(left[i]);
            i += 1;
        }
    }
    merged.extend_from_slice(&left[i..]);
    merged.extend_from_slice(&right[j..]);
    merged
}

fn tax_sum(invoices: &[&OptimizedInvoice]) -> f64 {
    invoices.iter().map(|i| i.tax_amount).sum()
}

/// 评分贪心选择
#[derive(Debug, Clone, Copy)]
pub struct GreedySelector {
    params: SelectionConfig,
}

impl GreedySelector {
    pub fn new(params: SelectionConfig) -> Self {
        Self { params }
    }

    /// 顺序累加：不超过 target*(1+tol) 才加入，达到 target*(1-tol) 即停止
    pub fn greedy_accumulate<'a>(
        &self,
        sorted: &[&'a OptimizedInvoice],
        target_amount: f64,
    ) -> Vec<&'a OptimizedInvoice> {
        let tolerance = target_amount * self.params.tolerance;
        let mut selected = Vec::new();
        let mut current_total = 0.0;

        for invoice in sorted {
            let new_total = current_total + invoice.tax_amount;

            if new_total <= target_amount + tolerance {
                selected.push(*invoice);
                current_total = new_total;

                if current_total >= target_amount - tolerance {
                    break;
                }
            }
        }

        selected
    }

    /// 未达到 95% 时尝试调整组合
    pub fn refine_selection<'a>(
        &self,
        selected: Vec<&'a OptimizedInvoice>,
        target_amount: f64,
    ) -> Vec<&'a OptimizedInvoice> {
        let floor = target_amount * (1.0 - self.params.tolerance);
        if tax_sum(&selected) >= floor {
            return selected;
        }

        match attempt_better_combination(&selected, target_amount) {
            Some(adjusted) => adjusted,
            None => selected,
        }
    }
}

/// 在已选发票中找税额落在 [0.8, 1.2] 倍缺口内的一张，并与自身交换 (移到末尾)
///
/// 只在已选集合内调整，选中税额总和不会变化。
pub fn attempt_better_combination<'a>(
    selected: &[&'a OptimizedInvoice],
    target_amount: f64,
) -> Option<Vec<&'a OptimizedInvoice>> {
    let gap = target_amount - tax_sum(selected);
    if gap <= 0.0 {
        return None;
    }

    let swap = selected
        .iter()
        .copied()
        .filter(|inv| inv.tax_amount <= gap * 2.0)
        .find(|inv| inv.tax_amount >= gap * 0.8 && inv.tax_amount <= gap * 1.2)?;

    let mut adjusted: Vec<&OptimizedInvoice> = selected
        .iter()
        .copied()
        .filter(|inv| !std::ptr::eq(*inv, swap))
        .collect();
    adjusted.push(swap);
    Some(adjusted)
}

impl InvoiceSelector for GreedySelector {
    fn select(&self, candidates: &[OptimizedInvoice], target_amount: f64) -> Vec<OptimizedInvoice> {
        let valid = filter_valid_invoices(candidates);
        let sorted = sort_by_efficiency(&valid, self.params.tie_threshold);
        let accumulated = self.greedy_accumulate(&sorted, target_amount);

        tracing::debug!(
            "贪心选择: 候选 {} 张, 有效 {} 张, 累加选中 {} 张, 目标 {:.2}",
            candidates.len(),
            valid.len(),
            accumulated.len(),
            target_amount
        );

        self.refine_selection(accumulated, target_amount)
            .into_iter()
            .cloned()
            .collect()
    }
}

/// 精确子集和：税额按分向上取整，在 target*(1+tol) 以内取最接近目标的组合
///
/// 容量超过 `max_exact_cents`，或有效发票数 x 容量超过 `max_exact_work` 时退回贪心算法。
#[derive(Debug, Clone, Copy)]
pub struct ExactSubsetSelector {
    params: SelectionConfig,
}

impl ExactSubsetSelector {
    pub fn new(params: SelectionConfig) -> Self {
        Self { params }
    }
}

const UNREACHED: u32 = u32::MAX;

/// 税额按分向上取整，先扣掉浮点误差 (1.1 * 100 = 110.00000000000001)
fn tax_to_cents(tax_amount: f64) -> usize {
    (tax_amount * 100.0 - 1e-9).ceil() as usize
}

impl InvoiceSelector for ExactSubsetSelector {
    fn select(&self, candidates: &[OptimizedInvoice], target_amount: f64) -> Vec<OptimizedInvoice> {
        let ceiling = target_amount * (1.0 + self.params.tolerance);
        if ceiling <= 0.0 {
            return Vec::new();
        }

        let capacity = (ceiling * 100.0).floor() as usize;
        if capacity > self.params.max_exact_cents {
            tracing::warn!(
                "精确选择容量 {} 分超过上限 {}, 退回贪心算法",
                capacity,
                self.params.max_exact_cents
            );
            return GreedySelector::new(self.params).select(candidates, target_amount);
        }

        let valid = filter_valid_invoices(candidates);
        let work = valid.len().saturating_mul(capacity);
        if work > self.params.max_exact_work {
            tracing::warn!(
                "精确选择计算量 {} ({} 张 x {} 分) 超过上限 {}, 退回贪心算法",
                work,
                valid.len(),
                capacity,
                self.params.max_exact_work
            );
            return GreedySelector::new(self.params).select(candidates, target_amount);
        }

        let ranked = sort_by_efficiency(&valid, self.params.tie_threshold);
        let weights: Vec<usize> = ranked.iter().map(|i| tax_to_cents(i.tax_amount)).collect();

        // from[s]: 首次到达和 s 时加入的发票下标
        let mut from = vec![UNREACHED; capacity + 1];
        let mut reached = vec![false; capacity + 1];
        reached[0] = true;

        for (idx, &w) in weights.iter().enumerate() {
            if w == 0 || w > capacity {
                continue;
            }
            for s in (w..=capacity).rev() {
                if reached[s - w] && !reached[s] {
                    reached[s] = true;
                    from[s] = idx as u32;
                }
            }
        }

        let target_cents = ((target_amount * 100.0).round() as usize).min(capacity);
        let best = (0..=capacity)
            .filter(|&s| reached[s])
            .min_by(|&a, &b| {
                a.abs_diff(target_cents)
                    .cmp(&b.abs_diff(target_cents))
                    .then(b.cmp(&a))
            })
            .unwrap_or(0);

        let mut picked = Vec::new();
        let mut s = best;
        while s > 0 && from[s] != UNREACHED {
            let idx = from[s] as usize;
            picked.push(idx);
            s -= weights[idx];
        }
        picked.sort_unstable();

        tracing::debug!(
            "精确选择: 有效 {} 张, 选中 {} 张, 命中 {} 分 / 目标 {} 分",
            valid.len(),
            picked.len(),
            best,
            target_cents
        );

        picked.into_iter().map(|idx| ranked[idx].clone()).collect()
    }
}
