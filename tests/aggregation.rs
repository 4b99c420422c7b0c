// tests/aggregation.rs
//! Latest-edit reduction over synthetic block trees.

mod common;

use chrono::{DateTime, Utc};
use common::{at, id, paragraph, StubWorkspace};
use notion_activity::{
    ActivityAggregator, AppError, Block, ErrorCategory, FailureLog, FailurePolicy, NotionId,
    TraversalStrategy,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

const STRATEGIES: [TraversalStrategy; 2] =
    [TraversalStrategy::Sequential, TraversalStrategy::Concurrent];

/// (depth, width) of the generated trees.
const SHAPES: [(u32, u32); 7] = [(1, 1), (1, 8), (2, 3), (3, 4), (4, 2), (5, 2), (8, 1)];

struct SyntheticTree {
    workspace: StubWorkspace,
    root: NotionId,
    leaves: Vec<NotionId>,
    /// Number of blocks with children, root included.
    containers: usize,
    expected: DateTime<Utc>,
}

/// A full tree `depth` levels below the root, `width` children per node.
///
/// Timestamps are pseudo-random below 10 000 minutes; the last leaf gets
/// 20 000 so the maximum is known and sits at the deepest level.
fn synthetic_tree(depth: u32, width: u32, reversed: bool) -> SyntheticTree {
    let mut seed = 0x2545_f491_u64 ^ u64::from(depth * 31 + width);
    let mut next_minute = move || {
        seed = seed
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        ((seed >> 33) % 10_000) as i64
    };

    let root = id(1);
    let mut children: Vec<(NotionId, Vec<Block>)> = Vec::new();
    let mut leaves = Vec::new();
    let mut next_id = 2;
    let mut frontier = vec![root.clone()];

    for level in 1..=depth {
        let nested = level < depth;
        let mut next_frontier = Vec::new();
        for parent in frontier {
            let mut blocks = Vec::new();
            for _ in 0..width {
                let block = paragraph(next_id, Some(next_minute()), nested);
                next_id += 1;
                if nested {
                    next_frontier.push(block.id.clone());
                } else {
                    leaves.push(block.id.clone());
                }
                blocks.push(block);
            }
            children.push((parent, blocks));
        }
        frontier = next_frontier;
    }

    let hottest = leaves.last().cloned().expect("every tree has a leaf");
    for (_, blocks) in &mut children {
        for block in blocks.iter_mut().filter(|b| b.id == hottest) {
            block.last_edited_time = Some(at(20_000));
        }
        if reversed {
            blocks.reverse();
        }
    }

    let containers = children.len();
    let workspace = children
        .into_iter()
        .fold(StubWorkspace::new(), |w, (parent, blocks)| {
            w.children(&parent, blocks)
        });

    SyntheticTree {
        workspace,
        root,
        leaves,
        containers,
        expected: at(20_000),
    }
}

#[tokio::test]
async fn test_aggregate_is_maximum_of_subtree() {
    for (depth, width) in SHAPES {
        for strategy in STRATEGIES {
            for reversed in [false, true] {
                let tree = synthetic_tree(depth, width, reversed);
                let workspace = Arc::new(tree.workspace);
                let aggregator = ActivityAggregator::new(workspace.clone(), strategy);

                let latest = aggregator
                    .latest_edit_time(&tree.root, &FailureLog::new())
                    .await
                    .unwrap();

                assert_eq!(
                    latest,
                    Some(tree.expected),
                    "depth {} width {} {} reversed={}",
                    depth,
                    width,
                    strategy,
                    reversed
                );
                assert_eq!(workspace.total_requests(), tree.containers);
            }
        }
    }
}

#[tokio::test]
async fn test_leaves_are_never_fetched() {
    for strategy in STRATEGIES {
        let tree = synthetic_tree(3, 3, false);
        let workspace = Arc::new(tree.workspace);
        let aggregator = ActivityAggregator::new(workspace.clone(), strategy);

        aggregator
            .latest_edit_time(&tree.root, &FailureLog::new())
            .await
            .unwrap();

        assert_eq!(tree.leaves.len(), 27);
        for leaf in &tree.leaves {
            assert_eq!(workspace.requests_for(leaf), 0, "{} fetched {}", strategy, leaf);
        }
    }
}

#[tokio::test]
async fn test_container_timestamp_can_be_the_maximum() {
    // 1 → [2 (nested, 500), 3 (10)], 2 → [4 (20)]
    let workspace = StubWorkspace::new()
        .children(
            &id(1),
            vec![paragraph(2, Some(500), true), paragraph(3, Some(10), false)],
        )
        .children(&id(2), vec![paragraph(4, Some(20), false)]);
    let aggregator =
        ActivityAggregator::new(Arc::new(workspace), TraversalStrategy::Concurrent);

    assert_eq!(
        aggregator.latest_edit_time(&id(1), &FailureLog::new()).await.unwrap(),
        Some(at(500))
    );
}

#[tokio::test]
async fn test_children_without_timestamps_are_skipped() {
    let workspace = StubWorkspace::new()
        .children(
            &id(1),
            vec![paragraph(2, None, true), paragraph(3, None, false)],
        )
        .children(&id(2), vec![paragraph(4, Some(7), false)]);
    let aggregator =
        ActivityAggregator::new(Arc::new(workspace), TraversalStrategy::Sequential);

    let latest = aggregator.latest_edit_time(&id(1), &FailureLog::new()).await;
    assert_eq!(latest.unwrap(), Some(at(7)));
}

#[tokio::test]
async fn test_empty_block_is_absent() {
    let workspace = StubWorkspace::new().children(&id(1), vec![]);
    let aggregator =
        ActivityAggregator::new(Arc::new(workspace), TraversalStrategy::Concurrent);

    let latest = aggregator.latest_edit_time(&id(1), &FailureLog::new()).await;
    assert_eq!(latest.unwrap(), None);
}

/// 1 → [2 (nested), 3 (nested)], 2 → [4 (30)], 3 fails.
fn tree_with_failing_branch() -> StubWorkspace {
    StubWorkspace::new()
        .children(
            &id(1),
            vec![paragraph(2, Some(1), true), paragraph(3, Some(2), true)],
        )
        .children(&id(2), vec![paragraph(4, Some(30), false)])
        .failing(&id(3))
}

#[tokio::test]
async fn test_sequential_aborts_on_descendant_failure() {
    let aggregator = ActivityAggregator::new(
        Arc::new(tree_with_failing_branch()),
        TraversalStrategy::Sequential,
    );
    assert_eq!(aggregator.failure_policy(), FailurePolicy::Abort);

    let failures = FailureLog::new();
    let result = aggregator.latest_edit_time(&id(1), &failures).await;
    assert!(matches!(result, Err(AppError::NotionService { .. })));
    assert!(failures.is_empty());
}

#[tokio::test]
async fn test_concurrent_isolates_descendant_failure() {
    let aggregator = ActivityAggregator::new(
        Arc::new(tree_with_failing_branch()),
        TraversalStrategy::Concurrent,
    );
    assert_eq!(aggregator.failure_policy(), FailurePolicy::Isolate);

    let log = FailureLog::new();
    let latest = aggregator.latest_edit_time(&id(1), &log).await.unwrap();
    assert_eq!(latest, Some(at(30)));

    let failures = log.drain();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].block_id, id(3));
    assert_eq!(failures[0].category, ErrorCategory::Transport);
}

#[tokio::test]
async fn test_policy_overrides_strategy_default() {
    let concurrent_abort = ActivityAggregator::new(
        Arc::new(tree_with_failing_branch()),
        TraversalStrategy::Concurrent,
    )
    .with_failure_policy(FailurePolicy::Abort);
    let failures = FailureLog::new();
    assert!(concurrent_abort.latest_edit_time(&id(1), &failures).await.is_err());
    assert!(failures.is_empty());

    let sequential_isolate = ActivityAggregator::new(
        Arc::new(tree_with_failing_branch()),
        TraversalStrategy::Sequential,
    )
    .with_failure_policy(FailurePolicy::Isolate);
    assert_eq!(
        sequential_isolate.latest_edit_time(&id(1), &failures).await.unwrap(),
        Some(at(30))
    );
    assert_eq!(failures.len(), 1);
}

#[tokio::test]
async fn test_sequential_issues_one_request_at_a_time() {
    let tree = synthetic_tree(3, 3, false);
    let workspace = Arc::new(tree.workspace.with_delay(Duration::from_millis(1)));
    let aggregator = ActivityAggregator::new(workspace.clone(), TraversalStrategy::Sequential);

    aggregator.latest_edit_time(&tree.root, &FailureLog::new()).await.unwrap();
    assert_eq!(workspace.peak_in_flight(), 1);
}

#[tokio::test]
async fn test_results_are_positional() {
    // Subtree 2 is slow, subtree 3 fast: order follows the request, not completion.
    let workspace = StubWorkspace::new()
        .children(&id(2), vec![paragraph(4, Some(100), false)])
        .children(&id(3), vec![paragraph(5, Some(200), false)])
        .slow(&id(2), Duration::from_millis(30));
    let aggregator =
        ActivityAggregator::new(Arc::new(workspace), TraversalStrategy::Concurrent);

    let latest = aggregator
        .latest_edit_times(&[id(2), id(3)], &FailureLog::new())
        .await
        .unwrap();
    assert_eq!(latest, vec![Some(at(100)), Some(at(200))]);
}
