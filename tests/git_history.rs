//! Layouts of small repositories built on disk with git2.

use git2::{Oid, Repository, Signature, Time};
use git_lanes::{Error, GitReader, HistoryReader, Layout, LayoutConfig, LayoutEngine, MAINLINE};
use std::cell::Cell;
use tempfile::TempDir;

struct TestRepo {
    _dir: TempDir,
    repo: Repository,
    clock: Cell<i64>,
}

impl TestRepo {
    fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let repo = Repository::init(dir.path()).expect("init repository");
        Self {
            _dir: dir,
            repo,
            clock: Cell::new(1_700_000_000),
        }
    }

    #[track_caller]
    fn commit(&self, message: &str, parents: &[Oid]) -> Oid {
        let time = self.clock.get();
        self.clock.set(time + 60);
        let signature = Signature::new("test", "test@example.com", &Time::new(time, 0)).unwrap();
        let tree_id = self.repo.treebuilder(None).unwrap().write().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let parents: Vec<git2::Commit<'_>> = parents
            .iter()
            .map(|id| self.repo.find_commit(*id).unwrap())
            .collect();
        let parents: Vec<&git2::Commit<'_>> = parents.iter().collect();
        self.repo
            .commit(None, &signature, &signature, message, &tree, &parents)
            .unwrap()
    }

    #[track_caller]
    fn chain(&self, name: &str, base: Option<Oid>, length: usize) -> Vec<Oid> {
        let mut ids = Vec::new();
        let mut parent = base;
        for n in 0..length {
            let parents: Vec<Oid> = parent.into_iter().collect();
            let id = self.commit(&format!("{name} {n}"), &parents);
            ids.push(id);
            parent = Some(id);
        }
        ids
    }

    #[track_caller]
    fn set_head(&self, id: Oid) {
        self.repo.reference("refs/heads/main", id, true, "test").unwrap();
        self.repo.set_head("refs/heads/main").unwrap();
    }

    fn reader(&self) -> GitReader {
        GitReader::open(self.repo.path()).unwrap()
    }

    fn layout(&self, config: LayoutConfig) -> Layout {
        LayoutEngine::new(config).run(&self.reader()).unwrap()
    }
}

fn depth(layout: &Layout, id: Oid) -> usize {
    layout.get(&id).expect("commit in layout").depth
}

fn lane(layout: &Layout, id: Oid) -> Option<usize> {
    layout.get(&id).expect("commit in layout").branch
}

#[test]
fn linear_chain_is_mainline_with_consecutive_depths() {
    let repo = TestRepo::new();
    let chain = repo.chain("main", None, 5);
    repo.set_head(chain[4]);

    let layout = repo.layout(LayoutConfig::default());

    assert_eq!(layout.len(), 5);
    for (n, id) in chain.iter().rev().enumerate() {
        assert_eq!(depth(&layout, *id), n);
        assert_eq!(lane(&layout, *id), Some(MAINLINE));
    }
    assert_eq!(layout.stats.pruned, 0);
}

#[test]
fn merge_of_two_branches_splits_into_two_lanes() {
    let repo = TestRepo::new();
    let base = repo.commit("base", &[]);
    let left = repo.chain("left", Some(base), 3);
    let right = repo.chain("right", Some(base), 3);
    let merge = repo.commit("merge", &[left[2], right[2]]);
    repo.set_head(merge);

    let layout = repo.layout(LayoutConfig::default());

    assert_eq!(depth(&layout, merge), 0);
    assert_eq!(depth(&layout, left[2]), 1);
    assert_eq!(depth(&layout, right[2]), 1);
    assert_eq!(depth(&layout, base), 4);
    let deepest_parent = depth(&layout, left[2]).max(depth(&layout, right[2]));
    assert_eq!(depth(&layout, merge), deepest_parent - 1);

    for id in &left {
        assert_eq!(lane(&layout, *id), Some(MAINLINE));
    }
    let side = lane(&layout, right[0]);
    assert!(side.is_some_and(|lane| lane > MAINLINE));
    for id in &right {
        assert_eq!(lane(&layout, *id), side);
    }
    assert_eq!(lane(&layout, base), Some(MAINLINE));
    assert!(layout.unassigned.is_empty());
}

#[test]
fn long_branch_is_cut_at_the_horizon() {
    let repo = TestRepo::new();
    let base = repo.commit("base", &[]);
    let main = repo.commit("main", &[base]);
    let branch = repo.chain("topic", Some(base), 10);
    let merge = repo.commit("merge", &[main, branch[9]]);
    repo.set_head(merge);

    let layout = repo.layout(LayoutConfig::default().with_horizon(5));

    // the branch starts at depth 1, so its first five commits survive
    let kept: Vec<Oid> = branch.iter().rev().take(5).copied().collect();
    for id in &kept {
        assert!(layout.get(id).is_some());
    }
    for id in branch.iter().rev().skip(5) {
        assert!(layout.get(id).is_none());
    }
    assert!(layout.get(&base).is_none());
    assert_eq!(layout.stats.pruned, 6);
    assert_eq!(layout.stats.retained, layout.stats.explored - 6);
    assert_eq!(layout.stats.retained_max_depth, Some(5));
    assert!(layout.depth_violations().is_empty());
}

#[test]
fn diamond_merge_sits_directly_above_its_parents() {
    let repo = TestRepo::new();
    let root = repo.commit("root", &[]);
    let base = repo.commit("base", &[root]);
    let short = repo.chain("short", Some(base), 1);
    let long = repo.chain("long", Some(base), 2);
    let merge = repo.commit("merge", &[short[0], long[1]]);
    let tip = repo.commit("tip", &[merge]);
    repo.set_head(tip);

    let layout = repo.layout(LayoutConfig::default());

    // re-derive the merge's parents from the repository, not the layout
    let parents: Vec<Oid> = repo.repo.find_commit(merge).unwrap().parent_ids().collect();
    assert_eq!(parents.len(), 2);
    let deepest_parent = parents.iter().map(|p| depth(&layout, *p)).max().unwrap();
    assert_eq!(depth(&layout, merge), deepest_parent - 1);
    for parent in &parents {
        assert_eq!(depth(&layout, *parent), depth(&layout, merge) + 1);
    }

    assert!(depth(&layout, base) > depth(&layout, long[0]));
    assert!(layout.depth_violations().is_empty());
    assert_eq!(layout.mainline(), vec![tip, merge, short[0], base, root]);
    assert_eq!(lane(&layout, long[0]), Some(1));
    assert_eq!(lane(&layout, long[1]), Some(1));
}

#[test]
fn layout_can_start_from_a_revision() {
    let repo = TestRepo::new();
    let chain = repo.chain("main", None, 4);
    repo.set_head(chain[3]);
    let reader = repo.reader();

    let start = reader.resolve("HEAD~2").unwrap();
    let layout = LayoutEngine::new(LayoutConfig::default())
        .run_from(&reader, start)
        .unwrap();

    assert_eq!(start, chain[1]);
    assert_eq!(layout.len(), 2);
    assert_eq!(layout.mainline(), vec![chain[1], chain[0]]);
    assert!(reader.commit_time(chain[0]).unwrap().is_some());
}

#[test]
fn unborn_head_is_a_repository_error() {
    let repo = TestRepo::new();
    let result = repo.reader().head();
    assert!(matches!(result, Err(Error::Repository(_))));
}

#[test]
fn repository_is_found_from_a_subdirectory() {
    let repo = TestRepo::new();
    let chain = repo.chain("main", None, 2);
    repo.set_head(chain[1]);
    let subdir = repo._dir.path().join("src").join("nested");
    std::fs::create_dir_all(&subdir).unwrap();

    let reader = GitReader::open(&subdir).unwrap();
    assert_eq!(reader.head().unwrap(), chain[1]);
}
