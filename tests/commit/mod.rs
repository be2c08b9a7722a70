mod commit_outside_a_repository_fails;
mod commit_staged_snapshot_successfully;
mod commit_with_broken_head_fails;
